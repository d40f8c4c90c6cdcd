//! Sequences over values that already exist.

use std::collections::HashMap;
use std::hash::Hash;
use std::io::BufRead;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Error, Pair, Sequence};

/// A sequence over the elements of a vector, in order.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let s = from_vec(vec!['a', 'b']);
/// assert_eq!(s.to_vec().unwrap(), vec!['a', 'b']);
/// ```
pub fn from_vec<T>(items: Vec<T>) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    let items = Arc::new(items);
    Sequence::generate(move |f| {
        for t in items.iter() {
            f(t.clone())?;
        }
        Ok(())
    })
}

/// A sequence over anything iterable that can be cloned for each traversal.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let s = from_iter(1..=3);
/// assert_eq!(s.sum(), Ok(6));
/// assert_eq!(s.sum(), Ok(6));
/// ```
pub fn from_iter<I>(iter: I) -> Sequence<I::Item>
where
    I: IntoIterator + Clone + Send + Sync + 'static,
{
    Sequence::generate(move |f| {
        for t in iter.clone() {
            f(t)?;
        }
        Ok(())
    })
}

/// Move the entries of a map into a sequence of key/value pairs.
///
/// The map is given up on the first traversal, so the sequence is volatile.
/// Entry order is unspecified.
pub fn from_map<K, V>(map: HashMap<K, V>) -> Sequence<Pair<K, V>>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    let map = Mutex::new(Some(map));
    Sequence::generate_volatile(move |f| {
        let Some(entries) = map.lock().take() else {
            return Err(Error::RepeatedUse);
        };
        for (k, v) in entries {
            f(Pair::new(k, v))?;
        }
        Ok(())
    })
}

/// Read `reader` line by line, without the line endings.
///
/// The reader is consumed by the first traversal, so the sequence is
/// volatile. A read error (including invalid UTF-8) ends the traversal with
/// that error wrapped as [`Error::Source`].
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let lines = from_lines(&b"alpha\nbeta\n"[..]);
/// assert_eq!(lines.to_vec().unwrap(), vec!["alpha", "beta"]);
/// assert_eq!(lines.count(), Err(Error::RepeatedUse));
/// ```
pub fn from_lines<R>(reader: R) -> Sequence<String>
where
    R: BufRead + Send + 'static,
{
    let reader = Mutex::new(Some(reader));
    Sequence::generate_volatile(move |f| {
        let Some(reader) = reader.lock().take() else {
            return Err(Error::RepeatedUse);
        };
        for line in reader.lines() {
            f(line.map_err(Error::wrap)?)?;
        }
        Ok(())
    })
}

/// A sequence that yields `value` exactly `n` times.
pub fn repeat<T>(value: T, n: usize) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    Sequence::generate(move |f| {
        for _ in 0..n {
            f(value.clone())?;
        }
        Ok(())
    })
}

/// A sequence of one element.
pub fn single<T>(value: T) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    repeat(value, 1)
}

/// A sequence that yields `value` forever.
///
/// Only useful behind something that stops early, such as
/// [`limit`](Sequence::limit) or [`zip`](crate::zip).
pub fn infinite<T>(value: T) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    Sequence::generate(move |f| {
        loop {
            f(value.clone())?;
        }
    })
}

/// A sequence with no elements.
pub fn empty<T: 'static>() -> Sequence<T> {
    Sequence::generate(|_| Ok(()))
}

/// A sequence that fails with `err` as soon as it is traversed.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let s = failing::<u8>(Error::msg("no data"));
/// assert_eq!(s.count().unwrap_err().to_string(), "no data");
/// ```
pub fn failing<T: 'static>(err: Error) -> Sequence<T> {
    Sequence::generate(move |_| Err(err.clone()))
}
