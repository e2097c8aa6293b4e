//! Viewport math over a [`RowHeights`] table.

use std::ops::Range;

use crate::heights::RowHeights;

/// Scroll offset and height of the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub scroll_top: u64,
    pub height: u64,
}

impl Viewport {
    pub fn new(scroll_top: u64, height: u64) -> Self {
        Self { scroll_top, height }
    }

    pub fn bottom(&self) -> u64 {
        self.scroll_top.saturating_add(self.height)
    }
}

/// Rows that intersect `viewport`, widened by `overscan` on both sides and
/// clamped to `[0, heights.len()]`. O(log n).
///
/// An empty viewport still anchors the window at the row under
/// `scroll_top`, so only the overscan rows are included.
pub fn visible_window(heights: &RowHeights, viewport: Viewport, overscan: usize) -> Range<usize> {
    let total = heights.len();
    let first = heights.index_at_offset(viewport.scroll_top);
    let last = if viewport.height == 0 {
        first
    } else {
        heights.rows_starting_before(viewport.bottom()).max(first)
    };

    let end = last.saturating_add(overscan).min(total);
    let start = first.saturating_sub(overscan).min(end);
    start..end
}

/// Scroll offset that brings row `index` fully into view with the least
/// movement, or `None` if it already is (or does not exist). Rows taller
/// than the viewport are aligned to their top edge.
pub fn reveal_offset(heights: &RowHeights, viewport: Viewport, index: usize) -> Option<u64> {
    if index >= heights.len() {
        return None;
    }
    let top = heights.row_top(index);
    let bottom = top + u64::from(heights.height_of(index));

    if top < viewport.scroll_top {
        Some(top)
    } else if bottom > viewport.bottom() {
        Some(bottom.saturating_sub(viewport.height).min(top))
    } else {
        None
    }
}
