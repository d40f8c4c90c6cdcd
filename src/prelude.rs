//! Commonly used imports
//!
//! Use `use pullseq::prelude::*;` for quick access to the most common types and functions.

// Core types
pub use crate::{Consumer, Error, Flow, Pair, Sequence};

// Sources
pub use crate::build::{
    counter, empty, failing, from_iter, from_lines, from_map, from_vec, infinite, range, repeat,
    simulate, single,
};

// Composition
pub use crate::compose::concat;

// Caching and single-use guards
pub use crate::cache::{buffer, materialize};
pub use crate::volatile::volatile;

// Concurrency
pub use crate::concurrent::{Parallelism, async_pool, from_chan, into_chan, sync, to_chan, zip, zip_longest};
