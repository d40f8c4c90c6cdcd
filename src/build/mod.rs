//! Building sequences from scratch
//!
//! This module provides the source sequences everything else is derived from.

mod numeric;
mod source;

pub use numeric::{Number, counter, range, simulate};
pub use source::{
    empty, failing, from_iter, from_lines, from_map, from_vec, infinite, repeat, single,
};
