//! A terminal browser for a generated table, rendered through a
//! [`vscroll::VirtualScroller`].

pub mod args;
pub mod error;
pub mod pager;
pub mod records;
pub mod view;

pub use args::Args;
pub use error::AppError;
pub use pager::{PageLoader, RangeGuard};
pub use records::{COLUMNS, Column, Kind, Record, SortKey, Table};
pub use view::{Action, TableView};
