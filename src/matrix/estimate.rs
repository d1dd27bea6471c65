//! Output size estimation for scratch-buffer sizing
//!
//! These numbers only size buffers. An estimate that is too small costs
//! extra buffer growth inside a worker, never a wrong product.

use crate::matrix::SparseMatrixCSR;

/// Nonzeros-per-row assumed for an operand with no rows or no entries
pub const DEFAULT_NNZ_PER_ROW: usize = 100;

/// Fraction of the full per-thread estimate allocated up front
pub const THREAD_CAPACITY_FACTOR: f64 = 0.75;

/// Entries added to every per-thread allocation
pub const THREAD_CAPACITY_SLACK: usize = 100;

fn average_nnz_per_row(nnz: usize, n_rows: usize) -> usize {
    if nnz == 0 || n_rows == 0 {
        DEFAULT_NNZ_PER_ROW
    } else {
        nnz / n_rows
    }
}

/// Estimates the number of entries per row of C = A·B
///
/// Uses `(sqrt(avg_a) + sqrt(avg_b) - 1)^2`, where the averages are the
/// integer nonzeros-per-row of each operand. The result is at least 1.
pub fn estimate_nnz_per_row(a_nnz: usize, a_rows: usize, b_nnz: usize, b_rows: usize) -> usize {
    let avg_a = average_nnz_per_row(a_nnz, a_rows) as f64;
    let avg_b = average_nnz_per_row(b_nnz, b_rows) as f64;

    // Negative roots (both averages zero) saturate to 0 on the cast
    let root = (avg_a.sqrt() + avg_b.sqrt() - 1.0) as usize;
    (root * root).max(1)
}

/// [`estimate_nnz_per_row`] for two local matrix fragments
pub fn estimate_for<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> usize {
    estimate_nnz_per_row(a.values.len(), a.n_rows, b.values.len(), b.n_rows)
}

/// Initial buffer capacity for a worker handling `n_rows` rows
pub fn thread_capacity(n_rows: usize, nnz_per_row: usize) -> usize {
    (n_rows as f64 * nnz_per_row as f64 * THREAD_CAPACITY_FACTOR) as usize + THREAD_CAPACITY_SLACK
}
