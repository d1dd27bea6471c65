//! Reference implementation of SpGEMM using a hash-map accumulator
//!
//! This provides a baseline for correctness testing. It walks the same
//! operands and translation tables as the threaded kernel, one row at a
//! time, and produces the same structure: an entry exists for every column
//! reached by a nonzero entry of A, even if its sum cancels to zero.

use std::collections::HashMap;
use std::ops::AddAssign;

use num_traits::Num;

use crate::error::{Fragment, Result, SpgemmError};
use crate::matrix::maps::RowLocation;
use crate::matrix::{LocalOperands, SparseMatrixCSR};

/// Sequential reference for [`gustavson_spgemm_local`](crate::gustavson_spgemm_local)
pub fn reference_spgemm_local<T>(ops: &LocalOperands<'_, T>) -> Result<SparseMatrixCSR<T>>
where
    T: Copy + Num + AddAssign,
{
    let a = ops.a;
    let mut row_ptr = Vec::with_capacity(a.n_rows + 1);
    let mut col_idx = Vec::new();
    let mut values = Vec::new();
    row_ptr.push(0);

    for i in 0..a.n_rows {
        let mut accum: HashMap<usize, T> = HashMap::new();

        for (k, &a_val) in a.row_iter(i) {
            if a_val.is_zero() {
                continue;
            }

            let (source, translation, fragment, row) = match ops.row_locations.get(k) {
                RowLocation::Local(row) => (ops.b, &ops.b_col_to_c, Fragment::Local, row),
                RowLocation::Import(row) => match (ops.import, &ops.import_col_to_c) {
                    (Some(import), Some(translation)) => (import, translation, Fragment::Import, row),
                    _ => return Err(SpgemmError::MissingImportFragment { row: i, column: k }),
                },
                RowLocation::Invalid => {
                    return Err(SpgemmError::MissingRowLocation { row: i, column: k })
                }
            };

            for (j, &b_val) in source.row_iter(row) {
                let c_col = translation.get(j).ok_or_else(|| {
                    SpgemmError::MissingColumnTranslation { fragment, row: i, column: j }
                })?;
                *accum.entry(c_col).or_insert(T::zero()) += a_val * b_val;
            }
        }

        let mut row_entries: Vec<_> = accum.into_iter().collect();
        row_entries.sort_by_key(|&(col, _)| col);

        for (j, val) in row_entries {
            col_idx.push(j);
            values.push(val);
        }
        row_ptr.push(col_idx.len());
    }

    Ok(SparseMatrixCSR::new(a.n_rows, ops.n_cols_c, row_ptr, col_idx, values))
}

/// Sequential reference for C = A·B with all of B local
///
/// # Panics
///
/// Panics if the columns of A do not match the rows of B.
pub fn reference_spgemm<T>(a: &SparseMatrixCSR<T>, b: &SparseMatrixCSR<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + AddAssign,
{
    assert_eq!(
        a.n_cols, b.n_rows,
        "Matrix dimensions must be compatible for multiplication"
    );

    let ops = match LocalOperands::local(a, b) {
        Ok(ops) => ops,
        Err(err) => panic!("{}", err),
    };
    match reference_spgemm_local(&ops) {
        Ok(c) => c,
        Err(err) => panic!("{}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::maps::{ColumnTranslation, RowLocationTable};

    #[test]
    fn test_reference_multiplication() {
        // A = [1 2; 0 3]
        // B = [4 5; 6 7]
        // C = A*B = [16 19; 18 21]
        let a = SparseMatrixCSR::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![1, 2, 3]);
        let b = SparseMatrixCSR::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![4, 5, 6, 7]);

        let result = reference_spgemm(&a, &b);

        assert_eq!(result.row_ptr, vec![0, 2, 4]);
        assert_eq!(result.col_idx, vec![0, 1, 0, 1]);
        assert_eq!(result.values, vec![16, 19, 18, 21]);
    }

    #[test]
    fn test_identity_multiplication() {
        let identity = SparseMatrixCSR::<i32>::identity(3);
        let diagonal = SparseMatrixCSR::new(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![5, 6, 7]);

        let result = reference_spgemm(&identity, &diagonal);

        for i in 0..3 {
            let row: Vec<_> = result.row_iter(i).collect();
            assert_eq!(row, vec![(i, &(i as i32 + 5))]);
        }
    }

    #[test]
    fn test_cancellation_keeps_entry() {
        // [1 1] * [1; -1] sums to zero but the entry is still produced
        let a = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![0, 1], vec![1, 1]);
        let b = SparseMatrixCSR::new(2, 1, vec![0, 1, 2], vec![0, 0], vec![1, -1]);

        let result = reference_spgemm(&a, &b);

        assert_eq!(result.col_idx, vec![0]);
        assert_eq!(result.values, vec![0]);
    }

    #[test]
    fn test_reference_with_import() {
        // Column 1 of A is served by the import fragment, whose only column
        // lands in column 2 of C
        let a = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![0, 1], vec![2.0, 3.0]);
        let b = SparseMatrixCSR::new(1, 2, vec![0, 1], vec![1], vec![5.0]);
        let import = SparseMatrixCSR::new(1, 1, vec![0, 1], vec![0], vec![7.0]);

        let ops = LocalOperands::new(
            &a,
            &b,
            Some((&import, ColumnTranslation::new(vec![Some(2)]))),
            RowLocationTable::new(vec![RowLocation::Local(0), RowLocation::Import(0)]),
            ColumnTranslation::new(vec![Some(0), Some(1)]),
            3,
        )
        .unwrap();

        let c = reference_spgemm_local(&ops).unwrap();

        assert_eq!(c.n_cols, 3);
        assert_eq!(c.col_idx, vec![1, 2]);
        assert_eq!(c.values, vec![10.0, 21.0]);
    }
}
