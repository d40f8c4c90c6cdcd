//! Terminal operations: reducing a sequence to an ordinary value.
//!
//! All of these are outermost entry points, so an early stop is never
//! reported as an error. Those that take `FnMut` closures or build up a
//! single value serialize async input first.

use std::{
    collections::HashMap,
    hash::{BuildHasher, Hash},
    ops::Add,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{Error, Flow, Pair, Sequence};

impl<T: Send + 'static> Sequence<T> {
    /// Collect every element into a vector.
    ///
    /// For an async sequence the order is whatever order elements arrived
    /// in.
    pub fn to_vec(&self) -> Result<Vec<T>, Error> {
        let mut items = Vec::new();
        self.append(&mut items)?;
        Ok(items)
    }

    /// Push every element onto the end of `dst`.
    ///
    /// Elements delivered before a failure stay in `dst`.
    pub fn append(&self, dst: &mut Vec<T>) -> Result<(), Error> {
        self.try_for_each(|t| {
            dst.push(t);
            Ok(())
        })
    }

    /// Reduce the sequence to one value, with a step that may end early.
    ///
    /// `f` updates the accumulator in place. Returning [`Error::Stop`] ends
    /// the traversal and keeps the accumulator as it is; any other error is
    /// returned instead of the accumulator.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let longest = from_vec(vec!["ab", "abcd", "abc"]).try_fold(0, |best, s| {
    ///     *best = (*best).max(s.len());
    ///     Ok(())
    /// });
    /// assert_eq!(longest, Ok(4));
    /// ```
    pub fn try_fold<U, F>(&self, init: U, mut f: F) -> Result<U, Error>
    where
        U: Send,
        F: FnMut(&mut U, T) -> Flow + Send,
    {
        let mut acc = init;
        self.try_for_each(|t| f(&mut acc, t))?;
        Ok(acc)
    }

    /// Reduce the sequence to one value.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let csv = from_vec(vec!["a", "b", "c"])
    ///     .fold(String::new(), |acc, s| if acc.is_empty() { s.to_string() } else { format!("{acc},{s}") });
    /// assert_eq!(csv, Ok("a,b,c".to_string()));
    /// ```
    pub fn fold<U, F>(&self, init: U, mut f: F) -> Result<U, Error>
    where
        U: Send,
        F: FnMut(&U, T) -> U + Send,
    {
        self.try_fold(init, |acc, t| {
            *acc = f(acc, t);
            Ok(())
        })
    }

    /// Count the elements.
    ///
    /// Async deliveries are counted where they happen, without serializing
    /// them.
    pub fn count(&self) -> Result<usize, Error> {
        let n = AtomicUsize::new(0);
        self.each(|_| {
            n.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })?;
        Ok(n.into_inner())
    }

    /// The first element, or `None` for an empty sequence.
    ///
    /// Stops the traversal as soon as an element arrives.
    pub fn first(&self) -> Result<Option<T>, Error> {
        let mut found = None;
        self.try_for_each(|t| {
            if found.is_none() {
                found = Some(t);
            }
            Err(Error::Stop)
        })?;
        Ok(found)
    }

    /// The final element, or `None` for an empty sequence.
    pub fn last(&self) -> Result<Option<T>, Error> {
        let mut found = None;
        self.try_for_each(|t| {
            found = Some(t);
            Ok(())
        })?;
        Ok(found)
    }

    /// Add up every element, starting from `T::default()`.
    pub fn sum(&self) -> Result<T, Error>
    where
        T: Add<Output = T> + Default,
    {
        self.try_fold(T::default(), |acc, t| {
            *acc = std::mem::take(acc) + t;
            Ok(())
        })
    }
}

impl<K, V> Sequence<Pair<K, V>>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    /// Insert every pair into `dst`, later keys overwriting earlier ones.
    pub fn into_map<S: BuildHasher + Send>(&self, dst: &mut HashMap<K, V, S>) -> Result<(), Error> {
        self.try_for_each(|p| {
            let (k, v) = p.into_parts();
            dst.insert(k, v);
            Ok(())
        })
    }

    /// Collect the pairs into a new map.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let names = from_vec(vec![1, 2]).zip(&from_vec(vec!["one", "two"]));
    /// let m = names.to_map().unwrap();
    /// assert_eq!(m[&2], "two");
    /// ```
    pub fn to_map(&self) -> Result<HashMap<K, V>, Error> {
        let mut m = HashMap::new();
        self.into_map(&mut m)?;
        Ok(m)
    }
}
