//! Deriving sequences from other sequences
//!
//! Most of this module is methods on [`Sequence`](crate::Sequence): mapping
//! and filtering, early termination, and concatenation.

mod chain;
mod limit;
mod map;

pub use chain::concat;
