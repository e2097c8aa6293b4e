//! Virtualized row scrolling.
//!
//! [`VirtualScroller`] keeps only the rows that intersect its viewport (plus
//! an overscan margin) attached to a [`rowdom::Dom`], so the element count
//! tracks the viewport size instead of the row count.
//!
//! # Example
//!
//! ```ignore
//! use rowdom::{Dom, Element};
//! use vscroll::{ScrollerConfig, VirtualScroller};
//!
//! let mut dom = Dom::new();
//! let container = dom.create(Element::box_());
//! dom.resize(container, 80, 24)?;
//!
//! let mut scroller = VirtualScroller::builder(ScrollerConfig::new(1, 100_000))
//!     .render_row(|dom, index| Ok(dom.create(Element::text(format!("row {index}")))))
//!     .on_visible_range_change(|start, end| log::debug!("showing {start}..{end}"))
//!     .mount(&mut dom, container)?;
//!
//! // Host loop: tick frames and route events back to the scroller.
//! dom.advance_frame();
//! for event in dom.drain_events() {
//!     scroller.handle_event(&mut dom, &event)?;
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fenwick;
pub mod heights;
pub mod schedule;
pub mod scroller;
pub mod viewport;

pub use cache::{MemoryRowCache, RowCache};
pub use config::ScrollerConfig;
pub use error::{RowError, ScrollerError};
pub use fenwick::FenwickTree;
pub use heights::RowHeights;
pub use schedule::{FrameSource, RenderScheduler, RenderState};
pub use scroller::{ScrollerBuilder, VirtualScroller};
pub use viewport::{Viewport, reveal_offset, visible_window};
