//! # Pullseq: Composable Push-Based Sequences
//!
//! Build lazy pipelines of values that are pushed, one at a time, into a
//! consumer, and that can be replayed, cached, zipped or spread over worker
//! threads.
//!
//! ## Core Types
//!
//! - **[`Sequence<T>`]**: A re-traversable source of values, built from a
//!   traversal function
//! - **[`Error`]** / **[`Flow`]**: The consumer's answer to every element, and
//!   the outcome of every traversal
//! - **[`Pair<A, B>`]**: The element type of zipped and map-like sequences
//!
//! ## Key Features
//!
//! - **Composable**: Derive new sequences with `.map()`, `.filter()`,
//!   `.limit()`, `.chain()` and friends
//! - **Single-use guards**: [`volatile`] sequences refuse a second traversal
//! - **Parallel delivery**: [`async_pool`] hands elements to a bounded group
//!   of worker threads; [`sync`] serializes them again
//! - **Caching**: [`buffer`] caches lazily, [`materialize`] eagerly
//! - **Zipping**: [`zip`] and [`zip_longest`] pair up two sequences by
//!   position
//!
//! ## Example
//!
//! ```
//! use pullseq::prelude::*;
//!
//! let squares = range(0_u64, 100, 1)
//!     .map(|x| x * x)
//!     .async_pool(4)
//!     .materialize();
//!
//! assert_eq!(squares.count(), Ok(100));
//! assert_eq!(squares.sum(), Ok(328_350));
//! ```
//!
//! ## Common Functions
//!
//! **Building Sequences:**
//! - [`from_vec(items)`](from_vec) - Replay the elements of a vector
//! - [`range(start, stop, step)`](range) - Step through numbers
//! - [`counter(start)`](counter) - Count up forever
//! - [`Sequence::generate(f)`] - Wrap a hand-written traversal loop
//!
//! **Consuming:**
//! - [`Sequence::each`] - Drive with a thread-safe consumer
//! - [`Sequence::for_each`] - Drive with an ordinary mutable closure
//! - [`Sequence::to_vec`], [`Sequence::count`], [`Sequence::fold`] - Reduce
//!   to a value
//! - [`Sequence::iter`] - Pull elements through a blocking iterator

mod build;
mod cache;
mod compose;
mod concurrent;
mod consume;
mod error;
mod iter;
mod pair;
mod sequence;
mod sort;
mod volatile;

pub mod prelude;

pub use build::*;
pub use cache::*;
pub use compose::*;
pub use concurrent::*;
pub use error::{Error, Flow};
pub use iter::SeqIter;
pub use pair::Pair;
pub use sequence::{Consumer, Sequence};
pub use volatile::volatile;
