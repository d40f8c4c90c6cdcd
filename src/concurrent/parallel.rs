//! Parallel traversal and its inverse.
//!
//! [`async_pool`] fans element deliveries out to a bounded group of worker
//! threads; [`sync`] puts them back behind a lock so a downstream consumer
//! never runs twice at the same time.

use std::thread;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::pool::{Parallelism, TaskGroup};
use crate::Sequence;

/// Deliver elements from parallel worker threads.
///
/// The source itself is traversed on the calling thread; every element is
/// handed to a worker that runs the downstream consumer. At most `n`
/// deliveries are in flight at once, and a value `<= 0` removes the limit.
///
/// - No ordering is guaranteed between deliveries.
/// - Downstream errors and early stops do not prevent the remaining elements
///   from being delivered. Submission goes on to the end of the source; the
///   first failure is reported once every worker is done.
/// - A worker failure is reported in preference to a source failure.
///
/// The result is async and, since a pool cannot be safely re-entered,
/// volatile. Use [`Sequence::materialize`] or [`Sequence::buffer`] to reuse
/// the results. Returns `seq` unchanged if it is already async.
///
/// ```rust
/// use pullseq::prelude::*;
///
/// let total = range(0_u64, 1000, 1).async_pool(4).sync().sum().unwrap();
/// assert_eq!(total, 499_500);
/// ```
pub fn async_pool<T: Send + 'static>(n: isize, seq: Sequence<T>) -> Sequence<T> {
    async_with(Parallelism::from_pool_size(n), seq)
}

/// [`async_pool`] with the limit taken from a [`Parallelism`] setting.
pub fn async_with<T: Send + 'static>(parallelism: Parallelism, seq: Sequence<T>) -> Sequence<T> {
    if seq.is_async() {
        return seq;
    }

    let upstream = seq.clone();
    let pooled = seq.derive(move |f| {
        let limit = parallelism.limit();
        debug!(limit = limit.map(|n| n.get()), "starting async pool traversal");
        let outcome = thread::scope(|scope| {
            let group = TaskGroup::new(scope, limit);
            let source = upstream.traverse(&|t| {
                trace!("submitting element to pool");
                group.spawn(move || f(t));
                Ok(())
            });
            group.wait().and(source)
        });
        debug!(ok = outcome.is_ok(), "async pool traversal finished");
        outcome
    });
    crate::volatile(pooled.set_async(true))
}

/// [`async_pool`] sized to the number of logical cores.
pub fn async_procs<T: Send + 'static>(seq: Sequence<T>) -> Sequence<T> {
    async_with(Parallelism::LogicalCores, seq)
}

/// [`async_pool`] sized to the number of physical cores.
pub fn async_cpus<T: Send + 'static>(seq: Sequence<T>) -> Sequence<T> {
    async_with(Parallelism::PhysicalCores, seq)
}

/// Serialize the deliveries of an async sequence.
///
/// Every call into the downstream consumer is made while holding one lock, so
/// no two calls overlap. Arrival order is still whatever the input produces.
/// Returns `seq` unchanged if it is not async.
pub fn sync<T: Send + 'static>(seq: Sequence<T>) -> Sequence<T> {
    if !seq.is_async() {
        return seq;
    }

    let upstream = seq.clone();
    seq.derive(move |f| {
        let lock = Mutex::new(());
        upstream.traverse(&|t| {
            let _guard = lock.lock();
            f(t)
        })
    })
    .set_async(false)
}

impl<T: Send + 'static> Sequence<T> {
    /// Method form of [`async_pool`].
    pub fn async_pool(self, n: isize) -> Self {
        async_pool(n, self)
    }

    /// Method form of [`async_with`].
    pub fn async_with(self, parallelism: Parallelism) -> Self {
        async_with(parallelism, self)
    }

    /// Method form of [`async_procs`].
    pub fn async_procs(self) -> Self {
        async_procs(self)
    }

    /// Method form of [`async_cpus`].
    pub fn async_cpus(self) -> Self {
        async_cpus(self)
    }

    /// Parallel traversal with the default pool size; an alias for
    /// [`async_cpus`].
    pub fn parallel(self) -> Self {
        async_cpus(self)
    }

    /// Method form of [`sync`].
    pub fn sync(self) -> Self {
        sync(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, from_vec, range};
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };
    use std::time::Duration;

    #[test]
    fn test_async_pool_marks_async_and_volatile() {
        let s = range(0, 10, 1).async_pool(2);
        assert!(s.is_async());
        assert!(s.is_volatile());
    }

    #[test]
    fn test_async_pool_is_noop_on_async_input() {
        let s = range(0, 10, 1).async_pool(2);
        let again = s.clone().async_pool(8);
        // Same single-use guard: the first traversal consumes both.
        assert_eq!(again.count(), Ok(10));
        assert_eq!(s.count(), Err(Error::RepeatedUse));
    }

    #[test]
    fn test_async_pool_delivers_every_element() {
        let mut got = range(0, 200, 1).async_pool(4).to_vec().unwrap();
        got.sort_unstable();
        assert_eq!(got, (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn test_unbounded_pool_handles_long_sequences() {
        let total = range(0_u64, 100_000, 1).async_pool(-1).count();
        assert_eq!(total, Ok(100_000));
    }

    #[test]
    fn test_async_pool_keeps_dispatching_after_failure() {
        let delivered = AtomicUsize::new(0);
        let boom = Error::msg("boom");

        let outcome = range(0, 50, 1).async_pool(3).each(|i| {
            delivered.fetch_add(1, Ordering::SeqCst);
            if i == 0 { Err(boom.clone()) } else { Ok(()) }
        });

        assert_eq!(outcome, Err(boom));
        assert_eq!(delivered.load(Ordering::SeqCst), 50);
    }

    #[test]
    fn test_async_pool_stop_is_not_an_error() {
        let outcome = range(0, 20, 1).async_pool(2).each(|i| {
            if i == 5 { Err(Error::Stop) } else { Ok(()) }
        });
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn test_worker_error_wins_over_source_error() {
        let source_err = Error::msg("source");
        let worker_err = Error::msg("worker");
        let failing = {
            let source_err = source_err.clone();
            Sequence::generate(move |f| {
                f(1)?;
                Err(source_err.clone())
            })
        };

        let outcome = failing.async_pool(1).each(|_| Err(worker_err.clone()));
        assert_eq!(outcome, Err(worker_err));

        let outcome = {
            let source_err = source_err.clone();
            Sequence::generate(move |f| {
                f(1)?;
                Err(source_err.clone())
            })
        }
        .async_pool(1)
        .each(|_| Ok(()));
        assert_eq!(outcome, Err(source_err));
    }

    #[test]
    fn test_sync_serializes_deliveries() {
        let active = Arc::new(AtomicUsize::new(0));
        let overlapped = Arc::new(AtomicUsize::new(0));

        range(0, 64, 1)
            .async_pool(8)
            .sync()
            .each(|_| {
                if active.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlapped.fetch_add(1, Ordering::SeqCst);
                }
                std::thread::sleep(Duration::from_micros(200));
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();

        assert_eq!(overlapped.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_sync_is_identity_on_plain_sequences() {
        let s = from_vec(vec![1, 2, 3]);
        let synced = s.clone().sync();
        assert!(!synced.is_async());
        assert_eq!(synced.to_vec().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_sync_clears_async_and_is_idempotent() {
        let once = range(0, 5, 1).async_pool(2).sync();
        assert!(!once.is_async());
        assert!(once.is_volatile());

        let twice = once.clone().sync();
        let mut got = twice.to_vec().unwrap();
        got.sort_unstable();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
    }
}
