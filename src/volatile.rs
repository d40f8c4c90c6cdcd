//! Single-use enforcement.
//!
//! Some sequences are damaged by being traversed (channels, async pools,
//! map iteration with unstable order). Wrapping them with [`volatile`] turns a
//! second traversal into an immediate [`Error::RepeatedUse`] instead of
//! silently producing different data.

use parking_lot::Mutex;
use tracing::debug;

use crate::{Error, Sequence};

/// Wrap a sequence so it can only be traversed once.
///
/// - The first traversal behaves exactly like the wrapped sequence: it may
///   complete, stop early, or fail.
/// - Every later traversal, and every traversal racing with the first, returns
///   [`Error::RepeatedUse`] without touching the wrapped sequence.
/// - The outcome of the first traversal does not matter; an early stop still
///   consumes the single use.
///
/// Any sequence can be wrapped, even one that is safe to replay.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let once = from_vec(vec![1, 2, 3]).volatile();
/// assert_eq!(once.to_vec().unwrap(), vec![1, 2, 3]);
/// assert_eq!(once.to_vec().unwrap_err(), Error::RepeatedUse);
/// ```
pub fn volatile<T: 'static>(seq: Sequence<T>) -> Sequence<T> {
    let used = Mutex::new(false);
    let upstream = seq.clone();
    seq.derive(move |f| {
        {
            let mut used = used.lock();
            if *used {
                debug!("rejecting repeated traversal of volatile sequence");
                return Err(Error::RepeatedUse);
            }
            *used = true;
        }
        upstream.traverse(f)
    })
    .set_volatile(true)
}
