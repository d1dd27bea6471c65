//! Operand bundle for one process's share of C = A·B

use crate::error::{Result, SpgemmError};
use crate::matrix::maps::{ColumnTranslation, RowLocationTable};
use crate::matrix::SparseMatrixCSR;

/// Everything the kernel reads to compute this process's rows of C
///
/// The rows of B needed by the local columns of A are split between the
/// locally owned fragment `b` and the optional `import` fragment fetched
/// from other processes. Both are read-only while the kernel runs.
#[derive(Clone)]
pub struct LocalOperands<'a, T> {
    /// Local rows of A
    pub a: &'a SparseMatrixCSR<T>,
    /// Locally owned rows of B
    pub b: &'a SparseMatrixCSR<T>,
    /// Rows of B owned elsewhere and imported for this multiply
    pub import: Option<&'a SparseMatrixCSR<T>>,
    /// Where the row of B for each local column of A lives
    pub row_locations: RowLocationTable,
    /// Local B column -> local C column
    pub b_col_to_c: ColumnTranslation,
    /// Import column -> local C column
    pub import_col_to_c: Option<ColumnTranslation>,
    /// Number of local columns of C
    pub n_cols_c: usize,
}

impl<'a, T> LocalOperands<'a, T> {
    /// Bundles and checks the operands
    ///
    /// Shapes and table targets are validated here. Entries that are
    /// [`RowLocation::Invalid`](crate::RowLocation::Invalid) or untranslated
    /// columns are accepted: they are only an error if the multiply reaches
    /// them.
    pub fn new(
        a: &'a SparseMatrixCSR<T>,
        b: &'a SparseMatrixCSR<T>,
        import: Option<(&'a SparseMatrixCSR<T>, ColumnTranslation)>,
        row_locations: RowLocationTable,
        b_col_to_c: ColumnTranslation,
        n_cols_c: usize,
    ) -> Result<Self> {
        if row_locations.len() != a.n_cols {
            return Err(SpgemmError::DimensionMismatch {
                what: "row location table length vs columns of A",
                expected: a.n_cols,
                got: row_locations.len(),
            });
        }
        if b_col_to_c.len() != b.n_cols {
            return Err(SpgemmError::DimensionMismatch {
                what: "local column translation length vs columns of B",
                expected: b.n_cols,
                got: b_col_to_c.len(),
            });
        }
        b_col_to_c.validate("local column translation", n_cols_c)?;

        let (import, import_col_to_c) = match import {
            Some((matrix, translation)) => {
                if translation.len() != matrix.n_cols {
                    return Err(SpgemmError::DimensionMismatch {
                        what: "import column translation length vs columns of import",
                        expected: matrix.n_cols,
                        got: translation.len(),
                    });
                }
                translation.validate("import column translation", n_cols_c)?;
                (Some(matrix), Some(translation))
            }
            None => (None, None),
        };

        row_locations.validate(b.n_rows, import.map(|m| m.n_rows))?;

        Ok(Self {
            a,
            b,
            import,
            row_locations,
            b_col_to_c,
            import_col_to_c,
            n_cols_c,
        })
    }

    /// Operands for a single process: every row of B is local and column
    /// indices carry over unchanged
    pub fn local(a: &'a SparseMatrixCSR<T>, b: &'a SparseMatrixCSR<T>) -> Result<Self> {
        if a.n_cols != b.n_rows {
            return Err(SpgemmError::DimensionMismatch {
                what: "columns of A vs rows of B",
                expected: a.n_cols,
                got: b.n_rows,
            });
        }
        Self::new(
            a,
            b,
            None,
            RowLocationTable::all_local(a.n_cols),
            ColumnTranslation::identity(b.n_cols),
            b.n_cols,
        )
    }
}
