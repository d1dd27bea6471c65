//! Accumulation and row-ordering building blocks for SpGEMM
//!
//! The multiply kernel combines three pieces from this module:
//!
//! - [`RowAccumulator`]: the Gustavson dense work array that merges all
//!   contributions to one output column within a row,
//! - [`ThreadFragment`]: a worker's private, growable compressed-row output,
//! - [`sort_rows`]: the final per-row column ordering of the merged output.

pub mod fragment;
pub mod gustavson;
pub mod sort;

pub use fragment::ThreadFragment;
pub use gustavson::RowAccumulator;
pub use sort::{sort_row, sort_rows};
