//! # Threaded Gustavson SpGEMM
//!
//! This module runs the multiply over a fixed pool of worker threads:
//!
//! 1. the rows of A are split into one contiguous range per thread,
//! 2. every thread multiplies its range into a private fragment,
//! 3. the fragments are merged into one set of compressed-row buffers,
//! 4. the columns of every row are sorted.
//!
//! Threads share nothing mutable during step 2; the join at its end is the
//! only synchronization point.

pub mod merge;
pub mod partition;
pub mod worker;

use std::ops::AddAssign;

use num_traits::Num;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, debug_span, info_span, warn};

use crate::accumulator::sort_rows;
use crate::error::{Result, SpgemmError};
use crate::matrix::config::{Phase, SpgemmConfig, MAX_RECOMMENDED_THREADS};
use crate::matrix::estimate::{estimate_for, thread_capacity};
use crate::matrix::{LocalOperands, SparseMatrixCSR};

pub use merge::{merge_fragments, MergedRows};
pub use partition::RowPartition;
pub use worker::multiply_rows;

/// Sizing and growth figures from one multiply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelStats {
    /// Estimated entries per row of C used to size the fragments
    pub nnz_per_row_estimate: usize,
    /// Initial entry capacity of each thread's fragment
    pub initial_capacity: Vec<usize>,
    /// Entries produced by each thread
    pub thread_nnz: Vec<usize>,
    /// Times each thread's fragment had to grow
    pub regrowths: Vec<usize>,
}

/// Computes this process's rows of C = A·B from distributed operands
///
/// The rows of B referenced by the local columns of A are looked up through
/// `ops.row_locations`, in the local fragment or the import fragment, and
/// their columns translated to columns of C. The result has `ops.a.n_rows`
/// rows, `ops.n_cols_c` columns and strictly ascending columns in each row.
///
/// # Errors
///
/// Fails, without producing a partial product, if a row of A reaches a
/// column with no row of B or a column of B with no column of C, if
/// `config.n_threads` is zero, or if the worker pool cannot be started.
///
/// # Examples
///
/// ```
/// use gustavson::{gustavson_spgemm_local, LocalOperands, SparseMatrixCSR, SpgemmConfig};
///
/// let a = SparseMatrixCSR::<f64>::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 2.0, 3.0]);
/// let b = SparseMatrixCSR::<f64>::identity(2);
///
/// let ops = LocalOperands::local(&a, &b).unwrap();
/// let c = gustavson_spgemm_local(&ops, &SpgemmConfig::with_threads(2)).unwrap();
///
/// assert_eq!(c.row_ptr, a.row_ptr);
/// assert_eq!(c.col_idx, a.col_idx);
/// assert_eq!(c.values, a.values);
/// ```
pub fn gustavson_spgemm_local<T>(
    ops: &LocalOperands<'_, T>,
    config: &SpgemmConfig,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign + Send + Sync,
{
    gustavson_spgemm_with_stats(ops, config).map(|(c, _)| c)
}

/// [`gustavson_spgemm_local`], also returning sizing statistics
pub fn gustavson_spgemm_with_stats<T>(
    ops: &LocalOperands<'_, T>,
    config: &SpgemmConfig,
) -> Result<(SparseMatrixCSR<T>, KernelStats)>
where
    T: Copy + Num + AddAssign + Send + Sync,
{
    let n_threads = config.n_threads;
    if n_threads == 0 {
        return Err(SpgemmError::InvalidThreadCount);
    }
    if n_threads > MAX_RECOMMENDED_THREADS {
        warn!(n_threads, "this kernel is not tuned for more than {} threads", MAX_RECOMMENDED_THREADS);
    }

    let span = info_span!("spgemm", label = config.label_str(), n_threads, rows = ops.a.n_rows);
    let _enter = span.enter();

    let partition = RowPartition::new(ops.a.n_rows, n_threads)?;
    let estimate = config
        .nnz_per_row_hint
        .unwrap_or_else(|| estimate_for(ops.a, ops.b));
    let tasks: Vec<_> = partition
        .ranges()
        .map(|rows| {
            let capacity = thread_capacity(rows.len(), estimate);
            (rows, capacity)
        })
        .collect();

    let pool = ThreadPoolBuilder::new().num_threads(n_threads).build()?;

    config.notify_start(Phase::Multiply);
    let fragments = debug_span!("multiply", estimate).in_scope(|| {
        pool.install(|| {
            tasks
                .par_iter()
                .map(|(rows, capacity)| multiply_rows(ops, rows.clone(), *capacity))
                .collect::<Result<Vec<_>>>()
        })
    })?;
    config.notify_finish(Phase::Multiply);

    for (t, fragment) in fragments.iter().enumerate() {
        debug!(
            thread = t,
            rows = fragment.n_rows(),
            nnz = fragment.len(),
            regrowths = fragment.regrowths(),
            "fragment complete"
        );
    }

    let stats = KernelStats {
        nnz_per_row_estimate: estimate,
        initial_capacity: tasks.iter().map(|&(_, capacity)| capacity).collect(),
        thread_nnz: fragments.iter().map(|f| f.len()).collect(),
        regrowths: fragments.iter().map(|f| f.regrowths()).collect(),
    };

    config.notify_start(Phase::Merge);
    let MergedRows {
        row_ptr,
        mut col_idx,
        mut values,
    } = debug_span!("merge").in_scope(|| pool.install(|| merge_fragments(&partition, &fragments)));
    drop(fragments);
    config.notify_finish(Phase::Merge);

    config.notify_start(Phase::Sort);
    pool.install(|| sort_rows(&row_ptr, &mut col_idx, &mut values));
    config.notify_finish(Phase::Sort);

    config.notify_start(Phase::Finalize);
    let c = SparseMatrixCSR {
        n_rows: ops.a.n_rows,
        n_cols: ops.n_cols_c,
        row_ptr,
        col_idx,
        values,
    };
    debug_assert!(c.has_sorted_rows());
    config.notify_finish(Phase::Finalize);

    Ok((c, stats))
}

/// Single-process SpGEMM: every row of B is local and columns of B are
/// columns of C
///
/// # Examples
///
/// ```
/// use gustavson::{gustavson_spgemm, SparseMatrixCSR, SpgemmConfig};
///
/// let a = SparseMatrixCSR::<f64>::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0]);
/// let b = SparseMatrixCSR::<f64>::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![2.0, 2.0]);
///
/// let c = gustavson_spgemm(&a, &b, &SpgemmConfig::default()).unwrap();
/// assert_eq!(c.values, vec![2.0, 2.0]);
/// ```
pub fn gustavson_spgemm<T>(
    a: &SparseMatrixCSR<T>,
    b: &SparseMatrixCSR<T>,
    config: &SpgemmConfig,
) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign + Send + Sync,
{
    let ops = LocalOperands::local(a, b)?;
    gustavson_spgemm_local(&ops, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_threads_rejected() {
        let a = SparseMatrixCSR::<f64>::identity(2);
        let result = gustavson_spgemm(&a, &a, &SpgemmConfig::with_threads(0));
        assert!(matches!(result, Err(SpgemmError::InvalidThreadCount)));
    }

    #[test]
    fn test_stats_cover_every_thread() {
        let a = SparseMatrixCSR::<f64>::identity(7);
        let ops = LocalOperands::local(&a, &a).unwrap();
        let (c, stats) = gustavson_spgemm_with_stats(&ops, &SpgemmConfig::with_threads(3)).unwrap();

        assert_eq!(c.nnz(), 7);
        assert_eq!(stats.nnz_per_row_estimate, 1);
        assert_eq!(stats.thread_nnz, vec![2, 2, 3]);
        assert_eq!(stats.initial_capacity, vec![101, 101, 102]);
        assert_eq!(stats.regrowths, vec![0, 0, 0]);
    }

    #[test]
    fn test_empty_a() {
        let a = SparseMatrixCSR::<f64>::zeros(0, 3);
        let b = SparseMatrixCSR::<f64>::identity(3);
        let c = gustavson_spgemm(&a, &b, &SpgemmConfig::with_threads(2)).unwrap();

        assert_eq!(c.n_rows, 0);
        assert_eq!(c.n_cols, 3);
        assert_eq!(c.row_ptr, vec![0]);
    }
}
