//! Error types for the SpGEMM kernel

use thiserror::Error;

/// Result type alias using the kernel's error
pub type Result<T> = std::result::Result<T, SpgemmError>;

/// Which fragment of the right-hand operand a lookup was made against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    /// Rows of B owned by the calling process
    Local,
    /// Rows of B imported from other processes
    Import,
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fragment::Local => write!(f, "local"),
            Fragment::Import => write!(f, "import"),
        }
    }
}

/// Errors that can occur while setting up or running a multiplication
///
/// Every variant that can be raised by the multiply phase is a structural
/// inconsistency in the caller-supplied operands; the multiplication is
/// aborted rather than producing a truncated product.
#[derive(Error, Debug)]
pub enum SpgemmError {
    /// A column of A has no row of B (local or imported) assigned to it
    #[error("row {row} of A references column {column}, which has no row location in B")]
    MissingRowLocation {
        /// Local row of A being multiplied
        row: usize,
        /// Local column of A whose row location is invalid
        column: usize,
    },

    /// A column of B (or of the import fragment) has no destination column in C
    #[error("row {row}: {fragment} column {column} has no translation to a column of C")]
    MissingColumnTranslation {
        /// Fragment the column belongs to
        fragment: Fragment,
        /// Local row of A being multiplied
        row: usize,
        /// Source column without a mapping
        column: usize,
    },

    /// A row location points at the import fragment but none was supplied
    #[error("row {row} of A references column {column}, located in an import fragment that was not supplied")]
    MissingImportFragment {
        /// Local row of A being multiplied
        row: usize,
        /// Local column of A
        column: usize,
    },

    /// Operand shapes or table lengths do not agree
    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Which quantity disagreed
        what: &'static str,
        /// Expected size
        expected: usize,
        /// Actual size
        got: usize,
    },

    /// A translation or row-location entry points past the end of its target
    #[error("{what} entry {index} maps to {target}, out of range for size {bound}")]
    TranslationOutOfRange {
        /// Which table held the entry
        what: &'static str,
        /// Source index of the entry
        index: usize,
        /// Target the entry maps to
        target: usize,
        /// Size of the target range
        bound: usize,
    },

    /// Compressed-row arrays are internally inconsistent
    #[error("malformed CSR matrix: {reason}")]
    MalformedMatrix {
        /// Description of the inconsistency
        reason: String,
    },

    /// The worker thread count must be positive
    #[error("worker thread count must be positive")]
    InvalidThreadCount,

    /// The worker pool could not be started
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
