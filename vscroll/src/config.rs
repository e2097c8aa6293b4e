//! Scroller configuration.

use log::LevelFilter;

use crate::error::ScrollerError;

/// Construction-time settings for a [`VirtualScroller`](crate::VirtualScroller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollerConfig {
    /// Nominal height of every row without an override. Must be positive.
    pub row_height: u32,

    /// Initial number of rows.
    pub total_rows: usize,

    /// Extra rows kept attached above and below the viewport.
    pub overscan: usize,

    /// Most verbose level this scroller logs at. Scoped to the instance, so
    /// two scrollers in one process can log differently.
    pub log_level: LevelFilter,
}

impl Default for ScrollerConfig {
    fn default() -> Self {
        Self {
            row_height: 1,
            total_rows: 0,
            overscan: 5,
            log_level: LevelFilter::Warn,
        }
    }
}

impl ScrollerConfig {
    pub fn new(row_height: u32, total_rows: usize) -> Self {
        Self {
            row_height,
            total_rows,
            ..Default::default()
        }
    }

    pub fn overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    /// Reject settings the layout math cannot work with.
    pub fn validate(&self) -> Result<(), ScrollerError> {
        if self.row_height == 0 {
            return Err(ScrollerError::invalid("row_height", "must be positive"));
        }
        let rows = u64::try_from(self.total_rows).unwrap_or(u64::MAX);
        if u64::from(self.row_height).checked_mul(rows).is_none() {
            return Err(ScrollerError::invalid(
                "total_rows",
                format!(
                    "{} rows of height {} overflow the content extent",
                    self.total_rows, self.row_height
                ),
            ));
        }
        Ok(())
    }
}
