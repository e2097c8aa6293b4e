//! Binary indexed tree over `u64` values.

/// Fenwick tree supporting point updates and prefix sums in O(log n).
///
/// # Invariants
///
/// 1. `prefix(k)` == sum of `values[0..k]`
/// 2. `upper_bound(t)` returns the largest `k` with `prefix(k) <= t`
#[derive(Debug, Clone, Default)]
pub struct FenwickTree {
    /// 1-indexed partial sums; `tree[0]` is unused.
    tree: Vec<u64>,
    values: Vec<u64>,
}

#[inline]
fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

impl FenwickTree {
    /// A tree of `len` zeros.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            tree: vec![0; len + 1],
            values: vec![0; len],
        }
    }

    /// Build from values in O(n).
    #[must_use]
    pub fn from_values(values: &[u64]) -> Self {
        let n = values.len();
        let mut tree = vec![0u64; n + 1];
        tree[1..].copy_from_slice(values);
        for i in 1..=n {
            let parent = i + lowbit(i);
            if parent <= n {
                tree[parent] = tree[parent].wrapping_add(tree[i]);
            }
        }
        Self {
            tree,
            values: values.to_vec(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `idx`, zero when out of range. O(1).
    #[must_use]
    pub fn get(&self, idx: usize) -> u64 {
        self.values.get(idx).copied().unwrap_or(0)
    }

    /// Replace the value at `idx`. Out-of-range indices are ignored.
    pub fn set(&mut self, idx: usize, value: u64) {
        let Some(slot) = self.values.get_mut(idx) else {
            return;
        };
        let old = std::mem::replace(slot, value);
        let mut i = idx + 1;
        while i < self.tree.len() {
            self.tree[i] = self.tree[i].wrapping_sub(old).wrapping_add(value);
            i += lowbit(i);
        }
    }

    /// Sum of the first `k` values (clamped to `len`).
    #[must_use]
    pub fn prefix(&self, k: usize) -> u64 {
        let mut i = k.min(self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.wrapping_add(self.tree[i]);
            i -= lowbit(i);
        }
        sum
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.prefix(self.len())
    }

    /// Largest `k` in `[0, len]` with `prefix(k) <= target`.
    #[must_use]
    pub fn upper_bound(&self, target: u64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        let mut pos = 0;
        let mut remaining = target;
        let mut step = 1usize << (usize::BITS - 1 - n.leading_zeros());
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next] <= remaining {
                pos = next;
                remaining -= self.tree[next];
            }
            step >>= 1;
        }
        pos
    }

    /// Grow or shrink to `new_len`; new slots take `fill`. O(n).
    pub fn resize(&mut self, new_len: usize, fill: u64) {
        if new_len == self.len() {
            return;
        }
        let mut values = std::mem::take(&mut self.values);
        values.resize(new_len, fill);
        *self = Self::from_values(&values);
    }
}
