//! Merge of per-thread fragments into one compressed-row triple

use num_traits::Zero;
use rayon::prelude::*;

use crate::accumulator::ThreadFragment;
use crate::parallel::partition::RowPartition;
use crate::utils::{exclusive_scan, split_by_lengths};

/// Merged compressed-row arrays of C, columns not yet sorted
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRows<T> {
    /// Global row pointers (size: rows + 1)
    pub row_ptr: Vec<usize>,
    /// Column indices of C
    pub col_idx: Vec<usize>,
    /// Values matching `col_idx`
    pub values: Vec<T>,
}

/// Copies the fragments into globally allocated buffers
///
/// The start offset of each fragment is the exclusive prefix sum of the
/// fragment sizes. Fragment `t` holds the rows of `partition.range(t)`; its
/// local row pointers and entries are shifted by that offset. Fragments are
/// copied in parallel into disjoint regions of the output.
///
/// # Panics
///
/// Panics if the fragments do not match the partition one-to-one.
pub fn merge_fragments<T>(partition: &RowPartition, fragments: &[ThreadFragment<T>]) -> MergedRows<T>
where
    T: Copy + Zero + Send + Sync,
{
    assert_eq!(
        fragments.len(),
        partition.n_parts(),
        "one fragment per partition range is required"
    );
    for (t, (fragment, range)) in fragments.iter().zip(partition.ranges()).enumerate() {
        assert_eq!(
            fragment.n_rows(),
            range.len(),
            "fragment {} covers {} rows, partition range has {}",
            t,
            fragment.n_rows(),
            range.len()
        );
    }

    let m = partition.n_rows();
    let totals: Vec<usize> = fragments.iter().map(ThreadFragment::len).collect();
    let offsets = exclusive_scan(&totals);
    let nnz = offsets[fragments.len()];

    let mut row_ptr = vec![0; m + 1];
    let mut col_idx = vec![0; nnz];
    let mut values = vec![T::zero(); nnz];

    let row_chunks = split_by_lengths(&mut row_ptr[..m], partition.ranges().map(|r| r.len()));
    let col_chunks = split_by_lengths(&mut col_idx, totals.iter().copied());
    let val_chunks = split_by_lengths(&mut values, totals.iter().copied());

    row_chunks
        .into_par_iter()
        .zip(col_chunks)
        .zip(val_chunks)
        .zip(fragments)
        .zip(&offsets[..fragments.len()])
        .for_each(|((((rows, cols), vals), fragment), &offset)| {
            for (slot, &local) in rows.iter_mut().zip(&fragment.row_ptr) {
                *slot = offset + local;
            }
            cols.copy_from_slice(&fragment.col_idx);
            vals.copy_from_slice(&fragment.values);
        });

    row_ptr[m] = nnz;

    MergedRows {
        row_ptr,
        col_idx,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(rows: &[&[(usize, f64)]]) -> ThreadFragment<f64> {
        let total: usize = rows.iter().map(|r| r.len()).sum();
        let mut fragment = ThreadFragment::new(rows.len(), total);
        for (local, row) in rows.iter().enumerate() {
            for &(col, val) in row.iter() {
                fragment.push(col, val);
            }
            fragment.close_row(local);
        }
        fragment
    }

    #[test]
    fn test_merge_uneven_partition() {
        // 5 rows over 2 parts: 0..2 and 2..5
        let partition = RowPartition::new(5, 2).unwrap();
        let fragments = vec![
            fragment(&[&[(1, 1.0)], &[(0, 2.0), (2, 3.0)]]),
            fragment(&[&[], &[(2, 4.0)], &[(1, 5.0), (0, 6.0)]]),
        ];

        let merged = merge_fragments(&partition, &fragments);

        assert_eq!(merged.row_ptr, vec![0, 1, 3, 3, 4, 6]);
        assert_eq!(merged.col_idx, vec![1, 0, 2, 2, 1, 0]);
        assert_eq!(merged.values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_merge_with_empty_parts() {
        let partition = RowPartition::new(2, 3).unwrap();
        let fragments = vec![
            fragment(&[]),
            fragment(&[]),
            fragment(&[&[(0, 1.0)], &[(1, 2.0)]]),
        ];

        let merged = merge_fragments(&partition, &fragments);

        assert_eq!(merged.row_ptr, vec![0, 1, 2]);
        assert_eq!(merged.col_idx, vec![0, 1]);
    }

    #[test]
    fn test_merge_no_rows() {
        let partition = RowPartition::new(0, 2).unwrap();
        let fragments = vec![fragment(&[]), fragment(&[])];

        let merged = merge_fragments(&partition, &fragments);

        assert_eq!(merged.row_ptr, vec![0]);
        assert!(merged.col_idx.is_empty());
    }

    #[test]
    #[should_panic(expected = "one fragment per partition range is required")]
    fn test_merge_rejects_fragment_count_mismatch() {
        let partition = RowPartition::new(4, 2).unwrap();
        merge_fragments(&partition, &[fragment(&[&[], &[], &[], &[]])]);
    }
}
