//! Row element cache.

use std::collections::HashMap;

use rowdom::NodeId;

/// Memo of built row elements keyed by row index.
///
/// The scroller does get-or-compute against this: a hit is reattached
/// as-is, a miss calls the row builder and inserts the result. Entries leave
/// only through [`RowCache::evict`] or [`RowCache::drain`], which the
/// scroller calls on invalidation.
pub trait RowCache {
    fn get(&self, index: usize) -> Option<NodeId>;

    fn insert(&mut self, index: usize, node: NodeId);

    /// Remove and return the entry for `index`.
    fn evict(&mut self, index: usize) -> Option<NodeId>;

    /// Remove and return every entry.
    fn drain(&mut self) -> Vec<(usize, NodeId)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Unbounded in-memory cache.
#[derive(Debug, Default)]
pub struct MemoryRowCache {
    rows: HashMap<usize, NodeId>,
}

impl MemoryRowCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowCache for MemoryRowCache {
    fn get(&self, index: usize) -> Option<NodeId> {
        self.rows.get(&index).copied()
    }

    fn insert(&mut self, index: usize, node: NodeId) {
        self.rows.insert(index, node);
    }

    fn evict(&mut self, index: usize) -> Option<NodeId> {
        self.rows.remove(&index)
    }

    fn drain(&mut self) -> Vec<(usize, NodeId)> {
        self.rows.drain().collect()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}
