//! Gustavson row accumulator with a low-water mark
//!
//! The accumulator keeps, per destination column, the position in the
//! thread's output fragment where that column's value for the current row
//! lives. Instead of clearing the array after every row, it remembers where
//! the current row started in the fragment (the low-water mark): any
//! recorded position below the mark belongs to an earlier row and is stale.
//! The array is therefore filled once per multiply, not once per row.

use std::ops::AddAssign;

use crate::accumulator::fragment::ThreadFragment;

/// Marker for a column never touched during this multiply
const UNUSED: usize = usize::MAX;

/// Dense per-thread accumulator indexed by destination column
#[derive(Debug, Clone)]
pub struct RowAccumulator {
    /// Fragment position holding each column's value, or `UNUSED`
    positions: Vec<usize>,

    /// Fragment length at the start of the current row
    low_water: usize,
}

impl RowAccumulator {
    /// Create an accumulator for a destination with `n_cols` columns
    pub fn new(n_cols: usize) -> Self {
        Self {
            positions: vec![UNUSED; n_cols],
            low_water: 0,
        }
    }

    /// Number of destination columns
    pub fn n_cols(&self) -> usize {
        self.positions.len()
    }

    /// Starts a row and returns the fragment position it starts at
    #[inline]
    pub fn begin_row(&self) -> usize {
        self.low_water
    }

    /// Adds `contribution` to column `col` of the current row
    ///
    /// The first contribution to a column in a row appends a new entry to
    /// `fragment`; later ones are summed into it.
    #[inline]
    pub fn touch<T>(&mut self, col: usize, contribution: T, fragment: &mut ThreadFragment<T>)
    where
        T: Copy + AddAssign,
    {
        let pos = self.positions[col];
        if pos == UNUSED || pos < self.low_water {
            self.positions[col] = fragment.push(col, contribution);
        } else {
            fragment.values[pos] += contribution;
        }
    }

    /// Ends the current row; `emitted` is the fragment length after it
    #[inline]
    pub fn end_row(&mut self, emitted: usize) {
        debug_assert!(emitted >= self.low_water);
        self.low_water = emitted;
    }
}
