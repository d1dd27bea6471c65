//! Index translation tables consumed by the multiply kernel
//!
//! A process holding rows of A and B only ever sees local indices. Before
//! the kernel runs, the caller builds:
//!
//! - a [`RowLocationTable`] telling, for each local column of A, where the
//!   matching row of B lives (locally owned, or in the import fragment),
//! - one [`ColumnTranslation`] per fragment of B, mapping its local column
//!   indices to the local column indices of C.
//!
//! [`ColumnMap`] is the ordered list of global ids behind a set of local
//! columns; translations are derived by matching global ids.

use std::collections::HashMap;

use crate::error::{Result, SpgemmError};

/// Location of the row of B that matches one local column of A
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLocation {
    /// Row `k` of the locally owned fragment of B
    Local(usize),
    /// Row `k` of the imported fragment of B
    Import(usize),
    /// No row of B is available for this column
    Invalid,
}

/// Per-column row locations for the left operand's local columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLocationTable {
    locations: Vec<RowLocation>,
}

impl RowLocationTable {
    /// Wraps an explicit list of locations, one per local column of A
    pub fn new(locations: Vec<RowLocation>) -> Self {
        Self { locations }
    }

    /// Every column `k` of A maps to row `k` of the local B
    pub fn all_local(n: usize) -> Self {
        Self {
            locations: (0..n).map(RowLocation::Local).collect(),
        }
    }

    /// Builds the table from the two "target map" arrays a distributed
    /// import produces: a column with a local row wins, otherwise the
    /// import row is used, otherwise the column is [`RowLocation::Invalid`].
    ///
    /// # Panics
    ///
    /// Panics if the two arrays differ in length.
    pub fn from_targets(to_local_row: &[Option<usize>], to_import_row: &[Option<usize>]) -> Self {
        assert_eq!(
            to_local_row.len(),
            to_import_row.len(),
            "target maps must cover the same columns"
        );

        let locations = to_local_row
            .iter()
            .zip(to_import_row)
            .map(|(&local, &import)| match (local, import) {
                (Some(k), _) => RowLocation::Local(k),
                (None, Some(k)) => RowLocation::Import(k),
                (None, None) => RowLocation::Invalid,
            })
            .collect();

        Self { locations }
    }

    /// Location for local column `col` of A
    #[inline]
    pub fn get(&self, col: usize) -> RowLocation {
        self.locations[col]
    }

    /// Number of columns covered
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the table covers no columns
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub(crate) fn validate(&self, b_rows: usize, import_rows: Option<usize>) -> Result<()> {
        for (index, location) in self.locations.iter().enumerate() {
            match *location {
                RowLocation::Local(k) if k >= b_rows => {
                    return Err(SpgemmError::TranslationOutOfRange {
                        what: "row location (local)",
                        index,
                        target: k,
                        bound: b_rows,
                    });
                }
                RowLocation::Import(k) => {
                    // A missing import fragment is reported by the kernel
                    // only if the row is actually needed.
                    if let Some(bound) = import_rows {
                        if k >= bound {
                            return Err(SpgemmError::TranslationOutOfRange {
                                what: "row location (import)",
                                index,
                                target: k,
                                bound,
                            });
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Maps local column indices of one matrix fragment to local columns of C
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnTranslation {
    targets: Vec<Option<usize>>,
}

impl ColumnTranslation {
    /// Wraps an explicit mapping, one entry per source column
    pub fn new(targets: Vec<Option<usize>>) -> Self {
        Self { targets }
    }

    /// Column `j` maps to column `j`
    pub fn identity(n: usize) -> Self {
        Self {
            targets: (0..n).map(Some).collect(),
        }
    }

    /// Destination column for source column `col`, if one exists
    #[inline]
    pub fn get(&self, col: usize) -> Option<usize> {
        self.targets[col]
    }

    /// Number of source columns covered
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the table covers no columns
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub(crate) fn validate(&self, what: &'static str, bound: usize) -> Result<()> {
        for (index, target) in self.targets.iter().enumerate() {
            if let Some(target) = *target {
                if target >= bound {
                    return Err(SpgemmError::TranslationOutOfRange {
                        what,
                        index,
                        target,
                        bound,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Ordered global ids of a fragment's local columns
///
/// Local column `j` of the fragment is global column `global_ids[j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    global_ids: Vec<usize>,
}

impl ColumnMap {
    /// Creates a map from the global ids of the local columns, in local order
    pub fn new(global_ids: Vec<usize>) -> Self {
        Self { global_ids }
    }

    /// Contiguous map of `n` columns starting at global id `first`
    pub fn contiguous(first: usize, n: usize) -> Self {
        Self {
            global_ids: (first..first + n).collect(),
        }
    }

    /// Number of local columns
    pub fn len(&self) -> usize {
        self.global_ids.len()
    }

    /// Whether the map has no columns
    pub fn is_empty(&self) -> bool {
        self.global_ids.is_empty()
    }

    /// Global id of local column `local`
    pub fn global_id(&self, local: usize) -> usize {
        self.global_ids[local]
    }

    /// Global ids in local order
    pub fn global_ids(&self) -> &[usize] {
        &self.global_ids
    }

    /// Translation from this map's local columns to `dest`'s local columns,
    /// matching by global id. Columns whose id `dest` does not hold map to
    /// `None`.
    pub fn translation_to(&self, dest: &ColumnMap) -> ColumnTranslation {
        let lookup: HashMap<usize, usize> = dest
            .global_ids
            .iter()
            .enumerate()
            .map(|(local, &gid)| (gid, local))
            .collect();

        ColumnTranslation::new(self.global_ids.iter().map(|gid| lookup.get(gid).copied()).collect())
    }
}
