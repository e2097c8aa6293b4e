//! A small retained element tree for terminal hosts.
//!
//! Elements live in a [`Dom`] arena and are addressed by [`NodeId`]. Hosts
//! mutate positions and sizes, scroll containers, and observe the results
//! through a queue of [`DomEvent`]s: scroll notifications, resize
//! notifications and animation frames.

pub mod buffer;
pub mod element;
pub mod error;
pub mod event;
pub mod paint;
pub mod terminal;
pub mod text;
pub mod types;

pub use buffer::{Buffer, Cell};
pub use element::{Dom, Element, NodeId};
pub use error::DomError;
pub use event::{DomEvent, FrameHandle, ListenerId, ObserverId};
pub use paint::paint;
pub use terminal::Terminal;
pub use types::*;
