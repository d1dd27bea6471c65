//! Static row partitioning across worker threads

use std::ops::Range;

use crate::error::{Result, SpgemmError};

/// Contiguous, disjoint row ranges covering `[0, n_rows)`, one per worker
///
/// Every range but the last holds `n_rows / n_parts` rows; the last also
/// takes the remainder. The boundaries are computed once and reused by
/// every later phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowPartition {
    /// `bounds[t]..bounds[t + 1]` is the range of part `t`
    bounds: Vec<usize>,
}

impl RowPartition {
    /// Splits `n_rows` rows into `n_parts` ranges
    pub fn new(n_rows: usize, n_parts: usize) -> Result<Self> {
        if n_parts == 0 {
            return Err(SpgemmError::InvalidThreadCount);
        }

        let chunk = n_rows / n_parts;
        let mut bounds: Vec<usize> = (0..n_parts).map(|t| t * chunk).collect();
        bounds.push(n_rows);

        Ok(Self { bounds })
    }

    /// Number of parts
    pub fn n_parts(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Total number of rows covered
    pub fn n_rows(&self) -> usize {
        self.bounds[self.bounds.len() - 1]
    }

    /// Row range of part `t`
    pub fn range(&self, t: usize) -> Range<usize> {
        self.bounds[t]..self.bounds[t + 1]
    }

    /// All ranges in part order
    pub fn ranges(&self) -> impl ExactSizeIterator<Item = Range<usize>> + '_ {
        self.bounds.windows(2).map(|w| w[0]..w[1])
    }

    /// Part owning global row `row`, and the row's index within that part
    ///
    /// Empty parts never own a row.
    ///
    /// # Panics
    ///
    /// Panics if `row` is not below [`RowPartition::n_rows`].
    pub fn owner_of(&self, row: usize) -> (usize, usize) {
        assert!(row < self.n_rows(), "row {} outside partition of {} rows", row, self.n_rows());

        // Last part whose start is <= row
        let t = self.bounds[..self.n_parts()].partition_point(|&start| start <= row) - 1;
        (t, row - self.bounds[t])
    }
}
