//! Bounded task groups for fanning deliveries out to worker threads.
//!
//! A [`TaskGroup`] lives inside a [`std::thread::scope`], so jobs may borrow
//! the consumer of the traversal that created the group. Submission blocks
//! while the group is at its limit. Jobs are never cancelled: after one fails
//! the rest still run, and [`TaskGroup::wait`] reports the first failure.

use std::{
    any::Any,
    num::NonZeroUsize,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread::{Scope, ScopedJoinHandle},
};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::trace;

use crate::{Error, Flow};

/// How many consumer deliveries an async traversal may run at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parallelism {
    /// No cap on workers; idle ones are reused before another is started.
    Unbounded,
    /// At most this many deliveries in flight. `Limit(0)` means no limit.
    Limit(usize),
    /// One slot per logical core, as reported by the OS scheduler.
    LogicalCores,
    /// One slot per physical core.
    #[default]
    PhysicalCores,
}

impl Parallelism {
    /// Interpret a signed pool size: anything `<= 0` is unbounded.
    pub fn from_pool_size(n: isize) -> Self {
        match usize::try_from(n) {
            Ok(n) if n > 0 => Parallelism::Limit(n),
            _ => Parallelism::Unbounded,
        }
    }

    /// The in-flight limit, or `None` when unbounded.
    ///
    /// ```rust
    /// use pullseq::Parallelism;
    ///
    /// assert_eq!(Parallelism::Limit(4).limit().map(|n| n.get()), Some(4));
    /// assert_eq!(Parallelism::from_pool_size(-1).limit(), None);
    /// assert!(Parallelism::LogicalCores.limit().is_some());
    /// ```
    pub fn limit(self) -> Option<NonZeroUsize> {
        match self {
            Parallelism::Unbounded => None,
            Parallelism::Limit(n) => NonZeroUsize::new(n),
            Parallelism::LogicalCores => {
                Some(std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN))
            }
            Parallelism::PhysicalCores => {
                Some(NonZeroUsize::new(num_cpus::get_physical()).unwrap_or(NonZeroUsize::MIN))
            }
        }
    }
}

type Job<'env> = Box<dyn FnOnce() -> Flow + Send + 'env>;

/// A group of jobs running on scoped threads with an optional in-flight cap.
///
/// Jobs are handed over a rendezvous channel to workers that are started
/// lazily, whenever no idle worker is waiting. With a limit, at most `limit`
/// workers are started and submission blocks once they are all busy. Without
/// one there is no cap, but idle workers are still reused, so the thread
/// count follows the number of jobs in flight rather than the number
/// submitted.
pub(crate) struct TaskGroup<'scope, 'env: 'scope> {
    scope: &'scope Scope<'scope, 'env>,
    limit: Option<NonZeroUsize>,
    jobs: Sender<Job<'env>>,
    queue: Receiver<Job<'env>>,
    handles: Mutex<Vec<ScopedJoinHandle<'scope, ()>>>,
    outcome: Arc<Outcome>,
}

/// What the jobs of a group reported back.
#[derive(Default)]
struct Outcome {
    first_err: Mutex<Option<Error>>,
    panic: Mutex<Option<Box<dyn Any + Send>>>,
}

impl Outcome {
    fn run(&self, job: Job<'_>) {
        match panic::catch_unwind(AssertUnwindSafe(job)) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.first_err.lock().get_or_insert(err);
            }
            Err(payload) => {
                self.panic.lock().get_or_insert(payload);
            }
        }
    }
}

impl<'scope, 'env> TaskGroup<'scope, 'env> {
    pub(crate) fn new(scope: &'scope Scope<'scope, 'env>, limit: Option<NonZeroUsize>) -> Self {
        let (jobs, queue) = crossbeam_channel::bounded(0);
        TaskGroup {
            scope,
            limit,
            jobs,
            queue,
            handles: Mutex::new(Vec::new()),
            outcome: Arc::default(),
        }
    }

    /// Submit a job, blocking while the group is full.
    pub(crate) fn spawn<F>(&self, job: F)
    where
        F: FnOnce() -> Flow + Send + 'env,
    {
        let job: Job<'env> = Box::new(job);
        let job = match self.jobs.try_send(job) {
            Ok(()) => return,
            Err(TrySendError::Full(job) | TrySendError::Disconnected(job)) => job,
        };

        let mut handles = self.handles.lock();
        if self.limit.is_none_or(|limit| handles.len() < limit.get()) {
            trace!(workers = handles.len() + 1, "starting pool worker");
            let queue = self.queue.clone();
            let outcome = Arc::clone(&self.outcome);
            handles.push(self.scope.spawn(move || {
                let mut next = Some(job);
                while let Some(job) = next.take().or_else(|| queue.recv().ok()) {
                    outcome.run(job);
                }
            }));
            return;
        }
        drop(handles);

        // Every worker is busy; wait for one to come back for more. The
        // group owns a receiver, so the channel cannot disconnect here.
        let _ = self.jobs.send(job);
    }

    /// Wait for every submitted job and return the first recorded failure.
    ///
    /// A panic in any job is re-raised here once all jobs have finished.
    pub(crate) fn wait(self) -> Flow {
        let TaskGroup {
            jobs,
            queue,
            handles,
            outcome,
            ..
        } = self;
        drop(jobs);
        drop(queue);

        for handle in handles.into_inner() {
            if let Err(payload) = handle.join() {
                outcome.panic.lock().get_or_insert(payload);
            }
        }
        if let Some(payload) = outcome.panic.lock().take() {
            panic::resume_unwind(payload);
        }

        match outcome.first_err.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
