//! Row height table.

use std::collections::BTreeMap;

use crate::fenwick::FenwickTree;

/// Heights of rows `[0, len)`: a nominal height plus per-row overrides.
///
/// Offsets are answered from a [`FenwickTree`], so every query and update is
/// O(log n) rather than a walk from row 0.
///
/// # Invariants
///
/// 1. `row_top(i)` == sum of `height_of(j)` for `j < i`
/// 2. `total_height()` == `row_top(len)`
/// 3. Overrides at or beyond `len` are kept and applied when rows are added
#[derive(Debug, Clone)]
pub struct RowHeights {
    nominal: u32,
    overrides: BTreeMap<usize, u32>,
    tree: FenwickTree,
}

impl RowHeights {
    #[must_use]
    pub fn new(nominal: u32, len: usize) -> Self {
        Self {
            nominal,
            overrides: BTreeMap::new(),
            tree: FenwickTree::from_values(&vec![u64::from(nominal); len]),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn nominal(&self) -> u32 {
        self.nominal
    }

    /// Height of row `idx`: its override, or the nominal height.
    #[must_use]
    pub fn height_of(&self, idx: usize) -> u32 {
        self.overrides.get(&idx).copied().unwrap_or(self.nominal)
    }

    /// Whether row `idx` carries an override.
    #[must_use]
    pub fn is_overridden(&self, idx: usize) -> bool {
        self.overrides.contains_key(&idx)
    }

    /// Offset of the top edge of row `idx`. Indices past the end answer the
    /// total height.
    #[must_use]
    pub fn row_top(&self, idx: usize) -> u64 {
        self.tree.prefix(idx)
    }

    /// Index of the row containing `offset`, skipping zero-height rows.
    /// Offsets at or past the end answer `len`.
    #[must_use]
    pub fn index_at_offset(&self, offset: u64) -> usize {
        self.tree.upper_bound(offset)
    }

    /// Number of rows whose top edge lies strictly above `offset`.
    #[must_use]
    pub fn rows_starting_before(&self, offset: u64) -> usize {
        if offset == 0 {
            return 0;
        }
        (self.tree.upper_bound(offset - 1) + 1).min(self.len())
    }

    #[must_use]
    pub fn total_height(&self) -> u64 {
        self.tree.total()
    }

    /// Override the height of row `idx`.
    pub fn set(&mut self, idx: usize, height: u32) {
        self.overrides.insert(idx, height);
        self.tree.set(idx, u64::from(height));
    }

    /// Change the row count. New rows take their override if one was set,
    /// otherwise the nominal height.
    pub fn resize(&mut self, len: usize) {
        let old_len = self.len();
        if len == old_len {
            return;
        }
        self.tree.resize(len, u64::from(self.nominal));
        if len > old_len {
            for (&idx, &height) in self.overrides.range(old_len..len) {
                self.tree.set(idx, u64::from(height));
            }
        }
    }
}
