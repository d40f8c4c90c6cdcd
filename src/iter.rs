//! Pulling elements out of a sequence one at a time.
//!
//! A sequence pushes its elements into a consumer. To use one where an
//! [`Iterator`] is expected, the sequence is drained on a background thread
//! into a bounded channel, and the iterator reads from the other end.
//!
//! # Examples
//!
//! ```rust
//! use pullseq::prelude::*;
//!
//! let mut total = 0;
//! for n in counter(1_u32).limit(4).iter() {
//!     total += n.unwrap();
//! }
//! assert_eq!(total, 10);
//! ```
//!
//! A failing sequence yields its error last:
//!
//! ```rust
//! use pullseq::prelude::*;
//!
//! let s = single(1).chain(&failing(Error::msg("broken")));
//! let items: Vec<_> = s.iter().collect();
//! assert_eq!(items[0], Ok(1));
//! assert_eq!(items[1].as_ref().unwrap_err().to_string(), "broken");
//! ```

use std::iter::FusedIterator;

use crossbeam_channel::Receiver;

use crate::{Error, Sequence};

/// Blocking iterator over a sequence's elements.
///
/// Yields `Ok` for every element and, if the sequence fails, one final `Err`.
/// Dropping the iterator early stops the background drain at its next
/// element.
#[derive(Debug)]
pub struct SeqIter<T> {
    rx: Receiver<Result<T, Error>>,
}

impl<T> Iterator for SeqIter<T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }
}

impl<T> FusedIterator for SeqIter<T> {}

impl<T: Send + 'static> Sequence<T> {
    /// Iterate over the elements from a background drain.
    pub fn iter(&self) -> SeqIter<T> {
        SeqIter { rx: self.to_chan() }
    }
}

impl<T: Send + 'static> IntoIterator for Sequence<T> {
    type Item = Result<T, Error>;
    type IntoIter = SeqIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Send + 'static> IntoIterator for &Sequence<T> {
    type Item = Result<T, Error>;
    type IntoIter = SeqIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
