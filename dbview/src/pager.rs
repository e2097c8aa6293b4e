//! Page-at-a-time access to the table.
//!
//! Rows are served from pages of `page_size` records. A page is fetched the
//! first time one of its rows is asked for; when the visible window moves,
//! pages far away from it are dropped and the neighbouring pages prefetched.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::records::{Record, SortKey, Table};

/// Passes a range through only when it differs from the previous one.
///
/// The scroller reports its window after every render, including renders
/// that did not move it.
#[derive(Debug, Default)]
pub struct RangeGuard {
    last: Option<Range<usize>>,
}

impl RangeGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `start..end` is new.
    pub fn admit(&mut self, start: usize, end: usize) -> bool {
        let range = start..end;
        if self.last.as_ref() == Some(&range) {
            return false;
        }
        self.last = Some(range);
        true
    }

    /// Forget the last range, so the next one is admitted.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug)]
pub struct PageLoader {
    table: Table,
    page_size: usize,
    pages: BTreeMap<usize, Vec<Record>>,
    guard: RangeGuard,
    /// Page fetches so far.
    fetches: u64,
}

impl PageLoader {
    /// Pages kept on either side of the ones covering the window.
    const KEEP: usize = 2;

    pub fn new(table: Table, page_size: usize) -> Self {
        Self {
            table,
            page_size: page_size.max(1),
            pages: BTreeMap::new(),
            guard: RangeGuard::new(),
            fetches: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn fetches(&self) -> u64 {
        self.fetches
    }

    /// Indices of the pages currently held.
    pub fn loaded_pages(&self) -> Vec<usize> {
        self.pages.keys().copied().collect()
    }

    pub fn sort_key(&self) -> SortKey {
        self.table.sort_key()
    }

    /// Re-sort the table. Every loaded page is stale afterwards.
    pub fn sort_by(&mut self, key: SortKey) {
        self.table.sort_by(key);
        self.pages.clear();
        self.guard.reset();
        log::debug!("[PageLoader] sorted by {}", key.label());
    }

    fn page_of(&self, index: usize) -> usize {
        index / self.page_size
    }

    fn fetch(&mut self, page: usize) {
        if self.pages.contains_key(&page) {
            return;
        }
        let start = page * self.page_size;
        let rows = self.table.slice(start, start + self.page_size).to_vec();
        log::trace!("[PageLoader] fetched page {page} ({} rows)", rows.len());
        self.pages.insert(page, rows);
        self.fetches += 1;
    }

    /// The record at `index`, fetching its page if needed.
    pub fn row(&mut self, index: usize) -> Option<&Record> {
        if index >= self.table.len() {
            return None;
        }
        let page = self.page_of(index);
        self.fetch(page);
        self.pages
            .get(&page)
            .and_then(|rows| rows.get(index % self.page_size))
    }

    /// React to a new visible window: fetch the pages around it and drop the
    /// rest. Repeated windows are ignored. Returns whether anything was done.
    pub fn visible_range_changed(&mut self, start: usize, end: usize) -> bool {
        if !self.guard.admit(start, end) {
            return false;
        }
        if self.table.is_empty() {
            self.pages.clear();
            return true;
        }

        let last_page = self.page_of(self.table.len() - 1);
        let first = self.page_of(start).saturating_sub(Self::KEEP);
        let last = (self.page_of(end.saturating_sub(1).max(start)) + Self::KEEP).min(last_page);
        let keep = first..last + 1;

        self.pages.retain(|page, _| keep.contains(page));
        for page in keep {
            self.fetch(page);
        }
        log::debug!(
            "[PageLoader] window {start}..{end}, holding pages {:?}",
            self.loaded_pages()
        );
        true
    }
}
