//! Concurrent traversal
//!
//! This module provides bounded-parallel delivery, re-serialization of async
//! output, channel adapters, and concurrent two-sequence merging.

mod chan;
mod parallel;
mod pool;
mod zip;

/// Capacity of the bounded channels that hand elements from drain threads to
/// their readers.
pub const HANDOFF_CAPACITY: usize = 16;

// Re-export concurrent operations
pub use chan::{from_chan, into_chan, to_chan};
pub use parallel::{async_cpus, async_pool, async_procs, async_with, sync};
pub use pool::Parallelism;
pub use zip::{zip, zip_longest};
