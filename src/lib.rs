//! # gustavson: threaded sparse matrix-matrix multiplication
//!
//! This crate computes one process's rows of C = A·B for matrices stored in
//! compressed-row (CSR) form and distributed by rows across processes.
//! Within a process, the work is spread over a fixed pool of threads.
//!
//! ## Overview
//!
//! The rows of B needed by a process come from two places: the rows it owns
//! and an *import* fragment holding rows fetched from other processes ahead
//! of time. The kernel is told where each row lives through a
//! [`RowLocationTable`], and how each fragment's columns map onto the
//! columns of C through [`ColumnTranslation`] tables.
//!
//! ## Algorithm Components
//!
//! 1. **Capacity estimation**: a per-row size estimate for C sizes each
//!    thread's scratch buffers.
//! 2. **Row partitioning**: the rows of A are split into one contiguous
//!    range per thread.
//! 3. **Local multiply**: each thread runs Gustavson's algorithm over its
//!    range with a dense accumulator, writing into a private fragment that
//!    grows by doubling when needed.
//! 4. **Merge**: fragment sizes are prefix-summed and every fragment is
//!    copied into the global buffers.
//! 5. **Row sort**: columns are sorted within each row.
//!
//! ## Usage
//!
//! ```
//! use gustavson::{gustavson_spgemm, SparseMatrixCSR, SpgemmConfig};
//!
//! // A = [1 2; 0 3]
//! let a = SparseMatrixCSR::<f64>::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1.0, 2.0, 3.0]);
//! let b = SparseMatrixCSR::<f64>::identity(2);
//!
//! let config = SpgemmConfig::with_threads(2).label("example");
//! let c = gustavson_spgemm(&a, &b, &config).unwrap();
//!
//! assert_eq!(c.col_idx, a.col_idx);
//! assert_eq!(c.values, a.values);
//! ```
//!
//! With an import fragment, build a [`LocalOperands`] and call
//! [`gustavson_spgemm_local`].

pub mod accumulator;
pub mod error;
pub mod matrix;
pub mod parallel;
pub mod utils;

// Re-export primary components
pub use accumulator::{sort_rows, RowAccumulator, ThreadFragment};
pub use error::{Fragment, Result, SpgemmError};
pub use matrix::{reference_spgemm, reference_spgemm_local, LocalOperands, SparseMatrixCSR};
pub use matrix::{estimate_nnz_per_row, thread_capacity};
pub use matrix::{ColumnMap, ColumnTranslation, RowLocation, RowLocationTable};
pub use matrix::{Phase, PhaseObserver, SpgemmConfig, TracingObserver};
pub use parallel::{gustavson_spgemm, gustavson_spgemm_local, gustavson_spgemm_with_stats};
pub use parallel::{merge_fragments, multiply_rows, KernelStats, MergedRows, RowPartition};
pub use utils::{from_sprs_csr, to_sprs_csr};

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
