//! Per-thread Gustavson multiply over one contiguous row range of A

use std::ops::{AddAssign, Range};

use num_traits::Num;

use crate::accumulator::{RowAccumulator, ThreadFragment};
use crate::error::{Fragment, Result, SpgemmError};
use crate::matrix::maps::{ColumnTranslation, RowLocation};
use crate::matrix::{LocalOperands, SparseMatrixCSR};

/// Computes rows `rows` of C into a fresh thread fragment
///
/// `capacity` is the initial entry capacity of the fragment. Before each row
/// is accumulated the fragment is grown, by doubling, to hold the row's
/// worst case, so an undersized estimate only costs reallocations.
///
/// Returns an error if a row of A reaches a column with no row of B, or a
/// column of B with no destination column in C.
pub fn multiply_rows<T>(
    ops: &LocalOperands<'_, T>,
    rows: Range<usize>,
    capacity: usize,
) -> Result<ThreadFragment<T>>
where
    T: Copy + Num + AddAssign,
{
    let a = ops.a;
    let mut fragment = ThreadFragment::new(rows.len(), capacity);
    let mut accumulator = RowAccumulator::new(ops.n_cols_c);

    for (local_row, i) in rows.enumerate() {
        fragment.reserve_row(row_upper_bound(ops, i));
        accumulator.begin_row();

        for a_idx in a.row_ptr[i]..a.row_ptr[i + 1] {
            let a_col = a.col_idx[a_idx];
            let a_val = a.values[a_idx];

            // Explicit zeros contribute nothing
            if a_val.is_zero() {
                continue;
            }

            let (source, translation, kind, k) = resolve_row(ops, i, a_col)?;
            for b_idx in source.row_ptr[k]..source.row_ptr[k + 1] {
                let b_col = source.col_idx[b_idx];
                let c_col = translation.get(b_col).ok_or_else(|| {
                    SpgemmError::MissingColumnTranslation { fragment: kind, row: i, column: b_col }
                })?;
                accumulator.touch(c_col, a_val * source.values[b_idx], &mut fragment);
            }
        }

        accumulator.end_row(fragment.len());
        fragment.close_row(local_row);
    }

    Ok(fragment)
}

/// Fragment, translation table and row index of the row of B matching
/// column `a_col` of A
fn resolve_row<'o, T>(
    ops: &'o LocalOperands<'_, T>,
    row: usize,
    a_col: usize,
) -> Result<(&'o SparseMatrixCSR<T>, &'o ColumnTranslation, Fragment, usize)> {
    match ops.row_locations.get(a_col) {
        RowLocation::Local(k) => Ok((ops.b, &ops.b_col_to_c, Fragment::Local, k)),
        RowLocation::Import(k) => match (ops.import, ops.import_col_to_c.as_ref()) {
            (Some(import), Some(translation)) => Ok((import, translation, Fragment::Import, k)),
            _ => Err(SpgemmError::MissingImportFragment { row, column: a_col }),
        },
        RowLocation::Invalid => Err(SpgemmError::MissingRowLocation { row, column: a_col }),
    }
}

/// Most entries row `i` of C can hold: the number of products it receives,
/// capped at the width of C
fn row_upper_bound<T: Copy + Num>(ops: &LocalOperands<'_, T>, i: usize) -> usize {
    let a = ops.a;
    let products: usize = a.col_idx[a.row_ptr[i]..a.row_ptr[i + 1]]
        .iter()
        .map(|&a_col| match ops.row_locations.get(a_col) {
            RowLocation::Local(k) => ops.b.row_nnz(k),
            RowLocation::Import(k) => ops.import.map_or(0, |m| m.row_nnz(k)),
            RowLocation::Invalid => 0,
        })
        .sum();
    products.min(ops.n_cols_c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::maps::RowLocationTable;

    fn a_matrix() -> SparseMatrixCSR<f64> {
        // A = [1 2 0; 0 3 4; 5 0 6]
        SparseMatrixCSR::new(
            3, 3,
            vec![0, 2, 4, 6],
            vec![0, 1, 1, 2, 0, 2],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        )
    }

    fn b_matrix() -> SparseMatrixCSR<f64> {
        // B = diag(7, 8, 9)
        SparseMatrixCSR::new(3, 3, vec![0, 1, 2, 3], vec![0, 1, 2], vec![7.0, 8.0, 9.0])
    }

    #[test]
    fn test_multiply_full_range() {
        let a = a_matrix();
        let b = b_matrix();
        let ops = LocalOperands::local(&a, &b).unwrap();

        let fragment = multiply_rows(&ops, 0..3, 10).unwrap();

        assert_eq!(fragment.row_ptr, vec![0, 2, 4, 6]);
        assert_eq!(fragment.row(0), (&[0, 1][..], &[7.0, 16.0][..]));
        assert_eq!(fragment.row(1), (&[1, 2][..], &[24.0, 36.0][..]));
        assert_eq!(fragment.row(2), (&[0, 2][..], &[35.0, 54.0][..]));
    }

    #[test]
    fn test_multiply_sub_range_uses_local_rows() {
        let a = a_matrix();
        let b = b_matrix();
        let ops = LocalOperands::local(&a, &b).unwrap();

        let fragment = multiply_rows(&ops, 1..3, 10).unwrap();

        assert_eq!(fragment.n_rows(), 2);
        assert_eq!(fragment.row_ptr, vec![0, 2, 4]);
        assert_eq!(fragment.row(0), (&[1, 2][..], &[24.0, 36.0][..]));
    }

    #[test]
    fn test_tiny_capacity_grows() {
        let a = a_matrix();
        let b = b_matrix();
        let ops = LocalOperands::local(&a, &b).unwrap();

        let fragment = multiply_rows(&ops, 0..3, 1).unwrap();

        assert!(fragment.regrowths() > 0);
        assert_eq!(fragment.len(), 6);
    }

    #[test]
    fn test_invalid_row_location_aborts() {
        let a = a_matrix();
        let b = b_matrix();
        let ops = LocalOperands::new(
            &a,
            &b,
            None,
            RowLocationTable::new(vec![
                RowLocation::Local(0),
                RowLocation::Local(1),
                RowLocation::Invalid,
            ]),
            ColumnTranslation::identity(3),
            3,
        )
        .unwrap();

        // Row 0 never touches column 2
        assert!(multiply_rows(&ops, 0..1, 4).is_ok());

        let err = multiply_rows(&ops, 0..3, 4).unwrap_err();
        assert!(matches!(err, SpgemmError::MissingRowLocation { row: 1, column: 2 }));
    }

    #[test]
    fn test_missing_translation_aborts() {
        let a = a_matrix();
        let b = b_matrix();
        let ops = LocalOperands::new(
            &a,
            &b,
            None,
            RowLocationTable::all_local(3),
            ColumnTranslation::new(vec![Some(0), None, Some(2)]),
            3,
        )
        .unwrap();

        let err = multiply_rows(&ops, 0..3, 4).unwrap_err();
        assert!(matches!(
            err,
            SpgemmError::MissingColumnTranslation { fragment: Fragment::Local, row: 0, column: 1 }
        ));
    }

    #[test]
    fn test_import_without_fragment_aborts() {
        let a = a_matrix();
        let b = b_matrix();
        let ops = LocalOperands::new(
            &a,
            &b,
            None,
            RowLocationTable::new(vec![
                RowLocation::Import(0),
                RowLocation::Local(1),
                RowLocation::Local(2),
            ]),
            ColumnTranslation::identity(3),
            3,
        )
        .unwrap();

        let err = multiply_rows(&ops, 0..3, 4).unwrap_err();
        assert!(matches!(err, SpgemmError::MissingImportFragment { row: 0, column: 0 }));
    }

    #[test]
    fn test_upper_bound_capped_by_width() {
        let a = SparseMatrixCSR::new(1, 2, vec![0, 2], vec![0, 1], vec![1.0, 1.0]);
        let b = SparseMatrixCSR::new(2, 2, vec![0, 2, 4], vec![0, 1, 0, 1], vec![1.0; 4]);
        let ops = LocalOperands::local(&a, &b).unwrap();

        assert_eq!(row_upper_bound(&ops, 0), 2);
    }
}
