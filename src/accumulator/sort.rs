//! Per-row column sort for compressed-row output
//!
//! The accumulator emits each row's columns in first-touch order. Consumers
//! of C expect strictly ascending columns within a row, so the merged
//! arrays are sorted row by row before they are handed back.

use rayon::prelude::*;
use tracing::instrument;

use crate::utils::split_by_lengths;

/// Rows up to this length are sorted by insertion in place
const INSERTION_SORT_MAX: usize = 16;

/// Sorts the `(column, value)` pairs of every row by ascending column
///
/// Values move with their column. Columns are assumed unique within a row,
/// which the accumulator guarantees, so stability does not matter.
///
/// # Panics
///
/// Panics if `row_ptr` does not start at 0 and end at `col_idx.len()`, or
/// if `col_idx` and `values` differ in length.
#[instrument(level = "debug", skip_all, fields(n_rows = row_ptr.len().saturating_sub(1), nnz = col_idx.len()))]
pub fn sort_rows<T>(row_ptr: &[usize], col_idx: &mut [usize], values: &mut [T])
where
    T: Copy + Send,
{
    assert_eq!(col_idx.len(), values.len(), "col_idx.len() must equal values.len()");
    if let (Some(&first), Some(&last)) = (row_ptr.first(), row_ptr.last()) {
        assert_eq!(first, 0, "row_ptr must start at 0");
        assert_eq!(last, col_idx.len(), "row_ptr must end at nnz");
    }

    let row_lengths = || row_ptr.windows(2).map(|w| w[1] - w[0]);
    let cols = split_by_lengths(col_idx, row_lengths());
    let vals = split_by_lengths(values, row_lengths());

    cols.into_par_iter()
        .zip(vals)
        .for_each(|(cols, vals)| sort_row(cols, vals));
}

/// Sorts a single row's pairs by column
pub fn sort_row<T: Copy>(cols: &mut [usize], vals: &mut [T]) {
    debug_assert_eq!(cols.len(), vals.len());

    if cols.windows(2).all(|w| w[0] <= w[1]) {
        return;
    }

    if cols.len() <= INSERTION_SORT_MAX {
        for i in 1..cols.len() {
            let col = cols[i];
            let val = vals[i];
            let mut j = i;
            while j > 0 && cols[j - 1] > col {
                cols[j] = cols[j - 1];
                vals[j] = vals[j - 1];
                j -= 1;
            }
            cols[j] = col;
            vals[j] = val;
        }
        return;
    }

    let mut pairs: Vec<(usize, T)> = cols.iter().copied().zip(vals.iter().copied()).collect();
    pairs.sort_unstable_by_key(|&(col, _)| col);

    for (k, (col, val)) in pairs.into_iter().enumerate() {
        cols[k] = col;
        vals[k] = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_row_small() {
        let mut cols = vec![4, 1, 3, 0];
        let mut vals = vec![40.0, 10.0, 30.0, 0.5];
        sort_row(&mut cols, &mut vals);

        assert_eq!(cols, vec![0, 1, 3, 4]);
        assert_eq!(vals, vec![0.5, 10.0, 30.0, 40.0]);
    }

    #[test]
    fn test_sort_row_large() {
        let mut cols: Vec<usize> = (0..50).rev().collect();
        let mut vals: Vec<i64> = cols.iter().map(|&c| c as i64 * 3).collect();
        sort_row(&mut cols, &mut vals);

        assert_eq!(cols, (0..50).collect::<Vec<_>>());
        for (c, v) in cols.iter().zip(&vals) {
            assert_eq!(*v, *c as i64 * 3);
        }
    }

    #[test]
    fn test_sort_rows_keeps_rows_apart() {
        let row_ptr = vec![0, 3, 3, 5];
        let mut cols = vec![2, 0, 1, 7, 3];
        let mut vals = vec![2, 0, 1, 7, 3];
        sort_rows(&row_ptr, &mut cols, &mut vals);

        assert_eq!(cols, vec![0, 1, 2, 3, 7]);
        assert_eq!(vals, vec![0, 1, 2, 3, 7]);
    }

    #[test]
    fn test_sort_rows_empty() {
        let mut cols: Vec<usize> = Vec::new();
        let mut vals: Vec<f64> = Vec::new();
        sort_rows(&[0], &mut cols, &mut vals);
        sort_rows(&[], &mut cols, &mut vals);
        assert!(cols.is_empty());
    }

    #[test]
    #[should_panic(expected = "row_ptr must end at nnz")]
    fn test_sort_rows_rejects_short_row_ptr() {
        let mut cols = vec![1, 0];
        let mut vals = vec![1.0, 0.0];
        sort_rows(&[0, 1], &mut cols, &mut vals);
    }
}
