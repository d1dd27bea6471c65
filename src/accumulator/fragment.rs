//! Thread-private output fragment
//!
//! Each worker writes its rows of C into its own fragment. Capacity is
//! tracked explicitly so growth happens only by doubling, before a row is
//! accumulated, never in the middle of one.

/// Compressed-row output of one worker's contiguous row range
#[derive(Debug, Clone)]
pub struct ThreadFragment<T> {
    /// Row pointers local to the fragment (size: rows + 1)
    pub row_ptr: Vec<usize>,

    /// Column indices of C, in accumulation order within each row
    pub col_idx: Vec<usize>,

    /// Values matching `col_idx`
    pub values: Vec<T>,

    capacity: usize,
    regrowths: usize,
}

impl<T: Copy> ThreadFragment<T> {
    /// Creates a fragment for `n_rows` rows with room for `capacity` entries
    pub fn new(n_rows: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            capacity,
            regrowths: 0,
        }
    }

    /// Entries written so far
    #[inline]
    pub fn len(&self) -> usize {
        self.col_idx.len()
    }

    /// Whether no entries have been written
    pub fn is_empty(&self) -> bool {
        self.col_idx.is_empty()
    }

    /// Current entry capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of times the buffers were doubled
    pub fn regrowths(&self) -> usize {
        self.regrowths
    }

    /// Number of rows the fragment covers
    pub fn n_rows(&self) -> usize {
        self.row_ptr.len() - 1
    }

    /// Doubles capacity until `additional` more entries fit
    pub fn reserve_row(&mut self, additional: usize) {
        let needed = self.len() + additional;
        if needed <= self.capacity {
            return;
        }

        let mut capacity = self.capacity;
        while capacity < needed {
            capacity *= 2;
        }
        tracing::trace!(from = self.capacity, to = capacity, "growing thread fragment");

        self.col_idx.reserve_exact(capacity - self.col_idx.len());
        self.values.reserve_exact(capacity - self.values.len());
        self.capacity = capacity;
        self.regrowths += 1;
    }

    /// Appends a new entry and returns its position
    #[inline]
    pub fn push(&mut self, col: usize, val: T) -> usize {
        debug_assert!(self.len() < self.capacity, "row write exceeds reserved capacity");
        self.col_idx.push(col);
        self.values.push(val);
        self.col_idx.len() - 1
    }

    /// Records the end of local row `local_row`
    #[inline]
    pub fn close_row(&mut self, local_row: usize) {
        self.row_ptr[local_row + 1] = self.len();
    }

    /// Column/value slices of local row `local_row`
    pub fn row(&self, local_row: usize) -> (&[usize], &[T]) {
        let range = self.row_ptr[local_row]..self.row_ptr[local_row + 1];
        (&self.col_idx[range.clone()], &self.values[range])
    }
}
