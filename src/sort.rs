//! Reordering sequences.
//!
//! These operations drain their input immediately, reorder it in memory and
//! return a replayable sequence over the result. If draining fails, the
//! returned sequence fails with the same error every time it is traversed.

use std::cmp::Ordering;

use crate::Sequence;

impl<T: Clone + Send + Sync + 'static> Sequence<T> {
    /// Sort elements in ascending order. Equal elements may be reordered.
    ///
    /// ```rust
    /// use pullseq::prelude::*;
    ///
    /// let s = from_vec(vec![3, 1, 2]).sorted();
    /// assert_eq!(s.to_vec().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn sorted(&self) -> Self
    where
        T: Ord,
    {
        self.drained(|items| items.sort_unstable())
    }

    /// Sort elements with a comparator. Equal elements may be reordered.
    pub fn sorted_by<F>(&self, cmp: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.drained(|items| items.sort_unstable_by(cmp))
    }

    /// Sort elements with a comparator, keeping equal elements in their
    /// original order.
    pub fn sorted_by_stable<F>(&self, cmp: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.drained(|items| items.sort_by(cmp))
    }

    /// Reverse the order of elements.
    pub fn reversed(&self) -> Self {
        self.drained(|items| items.reverse())
    }

    fn drained<F: FnOnce(&mut Vec<T>)>(&self, reorder: F) -> Self {
        let drained = self.to_vec().map(|mut items| {
            reorder(&mut items);
            items
        });
        Sequence::from(drained)
    }
}
