//! Caching sequences for reuse.
//!
//! [`buffer`] fills its cache lazily during the first traversal;
//! [`materialize`] drains its input up front. Both turn a volatile or
//! expensive sequence into one that can be replayed from memory.

mod buffer;
mod materialize;

pub use buffer::buffer;
pub use materialize::materialize;
