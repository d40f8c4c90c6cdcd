//! Moving sequences across channels.

use std::thread;

use crossbeam_channel::{Receiver, Sender};

use super::HANDOFF_CAPACITY;
use crate::{Error, Sequence};

/// Create a sequence that yields everything received from a channel.
///
/// Traversal ends when every sender has been dropped. A channel can only be
/// drained once, so the sequence is volatile.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let (tx, rx) = crossbeam_channel::unbounded();
/// for i in 0..3 {
///     tx.send(i).unwrap();
/// }
/// drop(tx);
///
/// let seq = from_chan(rx);
/// assert_eq!(seq.to_vec().unwrap(), vec![0, 1, 2]);
/// assert!(seq.to_vec().is_err());
/// ```
pub fn from_chan<T: Send + 'static>(rx: Receiver<T>) -> Sequence<T> {
    Sequence::generate_volatile(move |f| {
        for t in rx.iter() {
            f(t)?;
        }
        Ok(())
    })
}

/// Send every element of `seq` into `tx`.
///
/// Stops quietly once every receiver is gone. Returns the first real error
/// produced by the sequence. The sender is dropped on return, closing the
/// channel unless other senders remain.
pub fn into_chan<T: Send + 'static>(tx: Sender<T>, seq: &Sequence<T>) -> Result<(), Error> {
    seq.each(|t| tx.send(t).map_err(|_| Error::Stop))
}

/// Push every element of `seq` into `tx` as `Ok`, followed by a single `Err`
/// if the sequence fails.
///
/// This is the drain half of [`zip`](crate::zip): a receiver that goes away
/// turns the next send into a stop, so the drain always terminates.
pub(crate) fn into_chan_results<T: Send>(tx: &Sender<Result<T, Error>>, seq: &Sequence<T>) {
    if let Err(err) = seq.each(|t| tx.send(Ok(t)).map_err(|_| Error::Stop)) {
        let _ = tx.send(Err(err));
    }
}

/// Drain a sequence on a background thread into a bounded channel.
///
/// Each element arrives as `Ok`; a failing sequence ends the channel with one
/// `Err`. Dropping the receiver early stops the drain at its next element.
pub fn to_chan<T: Send + 'static>(seq: Sequence<T>) -> Receiver<Result<T, Error>> {
    let (tx, rx) = crossbeam_channel::bounded(HANDOFF_CAPACITY);
    thread::spawn(move || into_chan_results(&tx, &seq));
    rx
}

impl<T: Send + 'static> Sequence<T> {
    /// Method form of [`to_chan`].
    pub fn to_chan(&self) -> Receiver<Result<T, Error>> {
        to_chan(self.clone())
    }
}
