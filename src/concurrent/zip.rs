//! Positional merging of two sequences.
//!
//! Each traversal drains both inputs on their own scoped threads into bounded
//! handoff channels and pairs items up by position. Pairing never depends on
//! which drain runs ahead of the other.

use std::thread;

use crossbeam_channel::Receiver;
use tracing::{debug, trace};

use super::{HANDOFF_CAPACITY, chan::into_chan_results};
use crate::{Error, Flow, Pair, Sequence};

/// When a zipped sequence ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exhaustion {
    /// As soon as either side runs out.
    Shortest,
    /// Once both sides have run out.
    Longest,
}

/// Pair up the elements of two sequences, ending with the shorter one.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let numbers = from_vec(vec![1, 2, 3, 4]);
/// let names = from_vec(vec!["one", "two", "three"]);
///
/// let zipped = zip(numbers, names).to_vec().unwrap();
/// assert_eq!(
///     zipped,
///     vec![Pair::new(1, "one"), Pair::new(2, "two"), Pair::new(3, "three")]
/// );
/// ```
///
/// A side error ends the zipped sequence with that error once it is read,
/// unless the other side has already run out at that position: errors past
/// the end of the shorter side are never seen. When both sides fail at the
/// same position the first side's error wins. The result is volatile if
/// either input is.
pub fn zip<A, B>(a: Sequence<A>, b: Sequence<B>) -> Sequence<Pair<A, B>>
where
    A: Send + 'static,
    B: Send + 'static,
{
    merged(a, b, Exhaustion::Shortest, |a, b| match (a, b) {
        (Some(a), Some(b)) => Some(Pair::new(a, b)),
        _ => None,
    })
}

/// Pair up the elements of two sequences until both are exhausted.
///
/// Once one side runs out, its slot is filled with `Default::default()`.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let numbers = from_vec(vec![1, 2, 3, 4]);
/// let names = from_vec(vec!["one", "two", "three"]);
///
/// let zipped = zip_longest(numbers, names).to_vec().unwrap();
/// assert_eq!(zipped.last(), Some(&Pair::new(4, "")));
/// ```
pub fn zip_longest<A, B>(a: Sequence<A>, b: Sequence<B>) -> Sequence<Pair<A, B>>
where
    A: Default + Send + 'static,
    B: Default + Send + 'static,
{
    merged(a, b, Exhaustion::Longest, |a, b| {
        Some(Pair::new(a.unwrap_or_default(), b.unwrap_or_default()))
    })
}

fn merged<A, B, P>(
    a: Sequence<A>,
    b: Sequence<B>,
    exhaustion: Exhaustion,
    pair: P,
) -> Sequence<Pair<A, B>>
where
    A: Send + 'static,
    B: Send + 'static,
    P: Fn(Option<A>, Option<B>) -> Option<Pair<A, B>> + Send + Sync + 'static,
{
    let volatile = a.is_volatile() || b.is_volatile();
    Sequence::generate(move |f| {
        let (a_tx, a_rx) = crossbeam_channel::bounded(HANDOFF_CAPACITY);
        let (b_tx, b_rx) = crossbeam_channel::bounded(HANDOFF_CAPACITY);
        let (a, b) = (&a, &b);
        thread::scope(|scope| {
            // Each drain owns its sender, so finishing a drain closes its side.
            scope.spawn(move || into_chan_results(&a_tx, a));
            scope.spawn(move || into_chan_results(&b_tx, b));

            let outcome = merge(&a_rx, &b_rx, exhaustion, &pair, f);
            // Closing our ends makes any pending drain send fail, which
            // the drains treat as a stop.
            drop(a_rx);
            drop(b_rx);
            outcome
        })
    })
    .set_volatile(volatile)
}

fn merge<A, B, P>(
    a_rx: &Receiver<Result<A, Error>>,
    b_rx: &Receiver<Result<B, Error>>,
    exhaustion: Exhaustion,
    pair: &P,
    f: &(dyn Fn(Pair<A, B>) -> Flow + Sync + '_),
) -> Flow
where
    P: Fn(Option<A>, Option<B>) -> Option<Pair<A, B>>,
{
    loop {
        let a = a_rx.recv().ok();
        let b = b_rx.recv().ok();

        // Exhaustion is judged on what arrived, failed items included.
        let done = match exhaustion {
            Exhaustion::Shortest => a.is_none() || b.is_none(),
            Exhaustion::Longest => a.is_none() && b.is_none(),
        };
        if done {
            return Ok(());
        }

        let a = a.transpose().inspect_err(|err| debug!(%err, "first zipped side failed"))?;
        let b = b.transpose().inspect_err(|err| debug!(%err, "second zipped side failed"))?;

        match pair(a, b) {
            Some(p) => {
                trace!("delivering zipped pair");
                f(p)?;
            }
            None => return Ok(()),
        }
    }
}

impl<A: Send + 'static> Sequence<A> {
    /// Method form of [`zip`].
    pub fn zip<B: Send + 'static>(&self, other: &Sequence<B>) -> Sequence<Pair<A, B>> {
        zip(self.clone(), other.clone())
    }

    /// Method form of [`zip_longest`].
    pub fn zip_longest<B>(&self, other: &Sequence<B>) -> Sequence<Pair<A, B>>
    where
        A: Default,
        B: Default + Send + 'static,
    {
        zip_longest(self.clone(), other.clone())
    }
}
