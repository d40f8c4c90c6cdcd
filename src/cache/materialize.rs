use std::sync::Arc;

use crate::{Error, Sequence};

/// Traverse a sequence right now and return a replayable copy of it.
///
/// The input is serialized with [`sync`](crate::sync) and drained on the
/// calling thread. Every traversal of the result replays the stored elements
/// in their original order and then reports how the source ended, so a
/// failure seen during the drain is seen again by every replay.
///
/// The result is neither volatile nor async.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let once = from_vec(vec![3, 1, 2]).volatile();
/// let stored = once.materialize();
///
/// assert_eq!(stored.to_vec().unwrap(), vec![3, 1, 2]);
/// assert_eq!(stored.to_vec().unwrap(), vec![3, 1, 2]);
/// ```
pub fn materialize<T>(seq: Sequence<T>) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    let mut items = Vec::new();
    let tail = seq
        .try_for_each(|t| {
            items.push(t);
            Ok(())
        })
        .err();

    let items = Arc::new(items);
    Sequence::generate(move |f| {
        for t in items.iter() {
            f(t.clone())?;
        }
        match &tail {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    })
}

impl<T: Clone + Send + Sync + 'static> Sequence<T> {
    /// Method form of [`materialize`].
    pub fn materialize(&self) -> Self {
        materialize(self.clone())
    }
}

/// Replay a drained vector, or fail with the error that ended the drain.
impl<T> From<Result<Vec<T>, Error>> for Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from(drained: Result<Vec<T>, Error>) -> Self {
        match drained {
            Ok(items) => crate::from_vec(items),
            Err(err) => crate::failing(err),
        }
    }
}
