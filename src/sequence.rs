//! The core sequence type.
//!
//! A [`Sequence<T>`] knows how to deliver its elements, one at a time, to a
//! caller-supplied consumer, and nothing more. Every transformation in this
//! crate is a new sequence whose traversal function wraps the traversal of its
//! upstream.
//!
//! # Examples
//!
//! ```rust
//! use pullseq::prelude::*;
//!
//! let evens = from_vec(vec![1, 2, 3, 4, 5, 6])
//!     .filter(|x| x % 2 == 0)
//!     .map(|x| x * 10);
//!
//! assert_eq!(evens.to_vec().unwrap(), vec![20, 40, 60]);
//! // Sequences are values; traversing again replays the whole chain.
//! assert_eq!(evens.count().unwrap(), 3);
//! ```

use std::{fmt, sync::Arc};

use parking_lot::Mutex;

use crate::error::{Error, Flow, settle};

/// Callback that receives each element and says whether to go on.
///
/// Consumers are `Fn + Sync` because an async sequence may call them from
/// several threads at once. Use [`Sequence::try_for_each`] to drive a
/// sequence with an ordinary `FnMut` closure.
pub type Consumer<'a, T> = dyn Fn(T) -> Flow + Sync + 'a;

type Traversal<T> = dyn Fn(&Consumer<'_, T>) -> Flow + Send + Sync;

/// A lazy, re-traversable series of values.
///
/// Cloning a sequence is cheap; clones share the same traversal function and
/// any private combinator state behind it.
pub struct Sequence<T> {
    traversal: Arc<Traversal<T>>,
    volatile: bool,
    is_async: bool,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Self {
            traversal: Arc::clone(&self.traversal),
            volatile: self.volatile,
            is_async: self.is_async,
        }
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("volatile", &self.volatile)
            .field("async", &self.is_async)
            .finish_non_exhaustive()
    }
}

impl<T> Sequence<T> {
    /// Create a sequence from a traversal function.
    ///
    /// The function is the loop that produces every value, handing each to
    /// the consumer. It must stop as soon as the consumer returns `Err` and
    /// return that error (or a real error of its own). It should not try to
    /// handle [`Error::Stop`] itself; the outermost entry point does that.
    ///
    /// ```rust
    /// use pullseq::Sequence;
    ///
    /// let squares = Sequence::generate(|f| {
    ///     for i in 1..=4 {
    ///         f(i * i)?;
    ///     }
    ///     Ok(())
    /// });
    /// assert_eq!(squares.to_vec().unwrap(), vec![1, 4, 9, 16]);
    /// ```
    pub fn generate<F>(traversal: F) -> Self
    where
        F: Fn(&Consumer<'_, T>) -> Flow + Send + Sync + 'static,
    {
        Sequence {
            traversal: Arc::new(traversal),
            volatile: false,
            is_async: false,
        }
    }

    /// Create a sequence from a traversal function that must only run once.
    ///
    /// Shorthand for `Sequence::generate(f).volatile()`.
    pub fn generate_volatile<F>(traversal: F) -> Self
    where
        T: 'static,
        F: Fn(&Consumer<'_, T>) -> Flow + Send + Sync + 'static,
    {
        crate::volatile(Self::generate(traversal))
    }

    /// Create a sequence derived from this one.
    ///
    /// The new sequence inherits the volatile and async traits of `self`.
    /// Combinators that change the contract override them afterwards.
    pub fn derive<U, F>(&self, traversal: F) -> Sequence<U>
    where
        F: Fn(&Consumer<'_, U>) -> Flow + Send + Sync + 'static,
    {
        Sequence {
            traversal: Arc::new(traversal),
            volatile: self.volatile,
            is_async: self.is_async,
        }
    }

    /// Run the raw traversal.
    ///
    /// The stop sentinel is returned as-is. This is the call combinators use
    /// on their upstream; end users normally want [`each`](Self::each).
    #[inline]
    pub fn traverse(&self, consumer: &Consumer<'_, T>) -> Flow {
        (self.traversal)(consumer)
    }

    /// Traverse the sequence, treating an early stop as success.
    ///
    /// Returns the first real error produced either by the sequence or by
    /// the consumer.
    pub fn each<F>(&self, consumer: F) -> Result<(), Error>
    where
        F: Fn(T) -> Flow + Sync,
    {
        settle(self.traverse(&consumer))
    }

    /// Like [`each`](Self::each) with a boolean consumer: `false` stops.
    pub fn each_while<F>(&self, consumer: F) -> Result<(), Error>
    where
        F: Fn(T) -> bool + Sync,
    {
        self.each(|t| if consumer(t) { Ok(()) } else { Err(Error::Stop) })
    }

    /// Whether the sequence may only be traversed once.
    #[inline]
    pub const fn is_volatile(&self) -> bool {
        self.volatile
    }

    /// Whether traversal may call the consumer from several threads.
    #[inline]
    pub const fn is_async(&self) -> bool {
        self.is_async
    }

    pub(crate) fn set_volatile(mut self, volatile: bool) -> Self {
        self.volatile = volatile;
        self
    }

    pub(crate) fn set_async(mut self, is_async: bool) -> Self {
        self.is_async = is_async;
        self
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// Drive the sequence with a mutable closure.
    ///
    /// Deliveries are serialized first (see [`sync`](Self::sync)), so the
    /// closure never runs twice at the same time.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let mut seen = Vec::new();
    /// from_vec(vec!["a", "b", "c"])
    ///     .try_for_each(|s| {
    ///         seen.push(s);
    ///         if s == "b" { Err(Error::Stop) } else { Ok(()) }
    ///     })
    ///     .unwrap();
    /// assert_eq!(seen, vec!["a", "b"]);
    /// ```
    pub fn try_for_each<F>(&self, consumer: F) -> Result<(), Error>
    where
        F: FnMut(T) -> Flow + Send,
    {
        let consumer = Mutex::new(consumer);
        self.clone().sync().each(|t| {
            let mut f = consumer.lock();
            (*f)(t)
        })
    }

    /// Drive the sequence to the end with a mutable closure.
    pub fn for_each<F>(&self, mut consumer: F) -> Result<(), Error>
    where
        F: FnMut(T) + Send,
    {
        self.try_for_each(|t| {
            consumer(t);
            Ok(())
        })
    }

    /// Mark this sequence as single-use. See [`volatile`](crate::volatile).
    pub fn volatile(self) -> Self {
        crate::volatile(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn numbers(n: usize) -> Sequence<usize> {
        Sequence::generate(move |f| {
            for i in 0..n {
                f(i)?;
            }
            Ok(())
        })
    }

    #[test]
    fn test_each_delivers_in_order() {
        let mut got = Vec::new();
        numbers(5).for_each(|i| got.push(i)).unwrap();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_each_swallows_stop_but_traverse_keeps_it() {
        let seen = AtomicUsize::new(0);
        let consumer = |i: usize| {
            seen.fetch_add(1, Ordering::SeqCst);
            if i == 2 { Err(Error::Stop) } else { Ok(()) }
        };

        assert_eq!(numbers(10).traverse(&consumer), Err(Error::Stop));
        assert_eq!(numbers(10).each(consumer), Ok(()));
        assert_eq!(seen.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_each_returns_consumer_failure() {
        let boom = Error::msg("boom");
        let err = numbers(3).each(|_| Err(boom.clone())).unwrap_err();
        assert_eq!(err, boom);
    }

    #[test]
    fn test_each_while_stops_on_false() {
        let seen = AtomicUsize::new(0);
        numbers(100)
            .each_while(|i| {
                seen.fetch_add(1, Ordering::SeqCst);
                i < 3
            })
            .unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_derive_inherits_flags() {
        let base = numbers(3).set_volatile(true).set_async(true);
        let upstream = base.clone();
        let derived: Sequence<String> = base.derive(move |f| upstream.traverse(&|i| f(i.to_string())));

        assert!(derived.is_volatile());
        assert!(derived.is_async());
    }

    #[test]
    fn test_generate_starts_with_clear_flags() {
        let s = numbers(1);
        assert!(!s.is_volatile());
        assert!(!s.is_async());
    }
}
