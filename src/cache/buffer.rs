//! Progressive caching of a sequence during its first traversal.

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::{Error, Flow, Sequence};

/// Cached elements plus how the source ended.
struct Store<T> {
    items: Vec<T>,
    filled: bool,
    /// Real error the source ended with, replayed after `items`.
    tail: Option<Error>,
}

/// Cache a sequence progressively, as it is first traversed.
///
/// Unlike [`materialize`](crate::materialize), nothing happens until the
/// buffered sequence is used. The first traversal forwards elements to its
/// consumer while recording them. If that consumer stops early or fails, the
/// rest of the source is still drained into the cache (without being
/// delivered), so every later traversal replays the complete sequence from
/// memory.
///
/// Only one traversal fills the cache; callers arriving during the fill wait
/// for it to finish and then replay. The fill may take as long as the first
/// consumer does.
///
/// The result is never volatile, which makes `buffer` the lazy way to reuse a
/// volatile sequence.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let once = from_vec(vec![1, 2, 3, 4]).volatile();
/// let buffered = once.buffer();
///
/// assert_eq!(buffered.first(), Ok(Some(1)));
/// // The early stop above still cached everything.
/// assert_eq!(buffered.to_vec().unwrap(), vec![1, 2, 3, 4]);
/// ```
pub fn buffer<T>(seq: Sequence<T>) -> Sequence<T>
where
    T: Clone + Send + Sync + 'static,
{
    let fill = Mutex::new(());
    let store = RwLock::new(Store {
        items: Vec::new(),
        filled: false,
        tail: None,
    });
    let upstream = seq.clone();

    seq.derive(move |f| {
        if store.read().filled {
            return replay(&store.read(), f);
        }

        let _filling = fill.lock();
        // Waiters take this path once the fill they queued behind is done.
        // A write lock here would block on every replay still in progress.
        if store.read().filled {
            return replay(&store.read(), f);
        }
        {
            let mut current = store.write();
            if !current.items.is_empty() {
                // Left behind by a fill that panicked part way.
                debug!(len = current.items.len(), "discarding partial buffer");
                current.items.clear();
            }
        }

        let halted: Mutex<Option<Error>> = Mutex::new(None);
        let source = upstream.traverse(&|t: T| {
            store.write().items.push(t.clone());
            if halted.lock().is_none() {
                if let Err(err) = f(t) {
                    halted.lock().get_or_insert(err);
                }
            }
            Ok(())
        });

        let mut current = store.write();
        current.filled = true;
        current.tail = source.clone().err().filter(Error::is_failure);
        debug!(len = current.items.len(), "buffer filled");
        drop(current);

        combine(halted.into_inner(), source)
    })
    .set_volatile(false)
}

fn replay<T: Clone>(store: &Store<T>, f: &(dyn Fn(T) -> Flow + Sync + '_)) -> Flow {
    for t in &store.items {
        f(t.clone())?;
    }
    match &store.tail {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}

/// A real consumer error beats a source error, which beats a consumer stop.
fn combine(consumer: Option<Error>, source: Flow) -> Flow {
    match consumer {
        Some(err) if err.is_failure() => Err(err),
        Some(stop) => source.and(Err(stop)),
        None => source,
    }
}

impl<T: Clone + Send + Sync + 'static> Sequence<T> {
    /// Method form of [`buffer`].
    pub fn buffer(&self) -> Self {
        buffer(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{from_vec, range};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use std::time::Duration;

    fn counted(runs: Arc<AtomicUsize>, n: u32) -> Sequence<u32> {
        Sequence::generate(move |f| {
            runs.fetch_add(1, Ordering::SeqCst);
            for i in 0..n {
                f(i)?;
            }
            Ok(())
        })
    }

    #[test]
    fn test_buffer_is_lazy() {
        let runs = Arc::new(AtomicUsize::new(0));
        let buffered = counted(Arc::clone(&runs), 3).buffer();
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        assert_eq!(buffered.to_vec().unwrap(), vec![0, 1, 2]);
        assert_eq!(buffered.to_vec().unwrap(), vec![0, 1, 2]);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_early_stop_still_fills_the_cache() {
        let runs = Arc::new(AtomicUsize::new(0));
        let buffered = counted(Arc::clone(&runs), 10).buffer();

        let delivered = AtomicUsize::new(0);
        buffered
            .each(|i| {
                delivered.fetch_add(1, Ordering::SeqCst);
                if i == 1 { Err(Error::Stop) } else { Ok(()) }
            })
            .unwrap();

        assert_eq!(delivered.load(Ordering::SeqCst), 2);
        assert_eq!(buffered.count(), Ok(10));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_consumer_failure_is_reported_and_cache_completed() {
        let boom = Error::msg("boom");
        let buffered = from_vec(vec![1, 2, 3]).buffer();

        assert_eq!(buffered.each(|_| Err(boom.clone())), Err(boom));
        assert_eq!(buffered.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_source_error_is_replayed() {
        let boom = Error::msg("boom");
        let failing = {
            let boom = boom.clone();
            Sequence::generate(move |f| {
                f('x')?;
                Err(boom.clone())
            })
        }
        .buffer();

        let mut seen = Vec::new();
        assert_eq!(failing.for_each(|c| seen.push(c)), Err(boom.clone()));
        assert_eq!(failing.for_each(|c| seen.push(c)), Err(boom));
        assert_eq!(seen, vec!['x', 'x']);
    }

    #[test]
    fn test_source_error_beats_consumer_stop() {
        let boom = Error::msg("boom");
        let failing = {
            let boom = boom.clone();
            Sequence::generate(move |f| {
                f(1)?;
                f(2)?;
                Err(boom.clone())
            })
        }
        .buffer();

        assert_eq!(failing.first(), Err(boom));
    }

    #[test]
    fn test_buffer_clears_volatility() {
        let buffered = from_vec(vec![1, 2]).volatile().buffer();
        assert!(!buffered.is_volatile());
        assert_eq!(buffered.count(), Ok(2));
        assert_eq!(buffered.count(), Ok(2));
    }

    #[test]
    fn test_concurrent_readers_share_one_fill() {
        let runs = Arc::new(AtomicUsize::new(0));
        let buffered = counted(Arc::clone(&runs), 500).buffer();

        let totals: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..6).map(|_| s.spawn(|| buffered.count())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(totals.iter().all(|t| *t == Ok(500)));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fill_waiters_are_not_blocked_by_a_parked_replay() {
        let (gate_tx, gate_rx) = crossbeam_channel::bounded::<()>(0);
        let buffered = Sequence::generate(move |f| {
            for i in 0..3 {
                f(i)?;
            }
            // Hold the fill open until the waiters have queued.
            let _ = gate_rx.recv();
            Ok(())
        })
        .buffer();
        let buffered = &buffered;

        let (entered_tx, entered_rx) = crossbeam_channel::unbounded();
        let (hold_tx, hold_rx) = crossbeam_channel::unbounded::<()>();
        let (done_tx, done_rx) = crossbeam_channel::unbounded();

        let results: Vec<_> = std::thread::scope(|s| {
            s.spawn(|| buffered.count());
            std::thread::sleep(Duration::from_millis(20));
            for _ in 0..4 {
                let done_tx = done_tx.clone();
                s.spawn(move || done_tx.send(buffered.count()));
            }
            std::thread::sleep(Duration::from_millis(20));
            drop(gate_tx);

            // A replay that stays parked inside its consumer.
            s.spawn(|| {
                buffered.each(|_| {
                    let _ = entered_tx.send(());
                    let _ = hold_rx.recv();
                    Ok(())
                })
            });
            let _ = entered_rx.recv();

            let results = (0..4)
                .map(|_| done_rx.recv_timeout(Duration::from_secs(2)))
                .collect();
            drop(hold_tx);
            results
        });

        assert_eq!(results, vec![Ok(Ok(3)); 4]);
    }

    #[test]
    fn test_buffering_an_async_sequence() {
        let buffered = range(0_u32, 100, 1).async_pool(4).buffer();
        let mut first = buffered.to_vec().unwrap();
        let mut second = buffered.to_vec().unwrap();
        first.sort_unstable();
        second.sort_unstable();
        assert_eq!(first, (0..100).collect::<Vec<_>>());
        assert_eq!(first, second);
    }
}
