// Matrix data structures, operand tables and sizing

pub mod config;
pub mod csr;
pub mod estimate;
pub mod maps;
pub mod operands;
pub mod reference;

pub use config::{Phase, PhaseObserver, SpgemmConfig, TracingObserver};
pub use csr::SparseMatrixCSR;
pub use estimate::{estimate_nnz_per_row, thread_capacity};
pub use maps::{ColumnMap, ColumnTranslation, RowLocation, RowLocationTable};
pub use operands::LocalOperands;
pub use reference::{reference_spgemm, reference_spgemm_local};
