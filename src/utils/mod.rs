//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs_csr, to_sprs_csr};

/// Computes an exclusive prefix sum (scan) for a vector
///
/// The result has one more element than the input; the last element is
/// the total.
pub fn exclusive_scan(input: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(input.len() + 1);
    let mut sum = 0;

    result.push(0); // First element is always 0

    for &val in input {
        sum += val;
        result.push(sum);
    }

    result
}

/// Splits `slice` into consecutive disjoint mutable pieces of the given lengths
///
/// # Panics
///
/// Panics if the lengths add up to more than `slice.len()`.
pub fn split_by_lengths<'a, X>(
    mut slice: &'a mut [X],
    lengths: impl IntoIterator<Item = usize>,
) -> Vec<&'a mut [X]> {
    lengths
        .into_iter()
        .map(|len| {
            let (head, tail) = std::mem::take(&mut slice).split_at_mut(len);
            slice = tail;
            head
        })
        .collect()
}
