use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::{Direction, Overflow, Position, Size, Style, TextAlign};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Handle to an element stored in a [`Dom`](super::Dom).
///
/// Arena slots are reused; the generation tells a handle to a removed
/// element apart from the element that took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl NodeId {
    /// Arena slot of this handle.
    pub fn slot(self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "node-{}", self.index)
        } else {
            write!(f, "node-{}v{}", self.index, self.generation)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    // Identity
    pub id: String,

    // Content
    pub text: Option<String>,

    // Box
    pub width: Size,
    pub height: Size,

    // Positioning
    pub position: Position,
    pub top: u64,
    pub left: u64,

    pub direction: Direction,
    pub overflow_y: Overflow,
    pub text_align: TextAlign,

    // Visual
    pub style: Style,

    // Custom data storage (row indices, column keys, etc.)
    pub data: HashMap<String, String>,

    // Tree state, owned by the Dom
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) scroll_top: u64,
    pub(crate) client_width: u64,
    pub(crate) client_height: u64,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: generate_id("el"),
            text: None,
            width: Size::Auto,
            height: Size::Auto,
            position: Position::Static,
            top: 0,
            left: 0,
            direction: Direction::Column,
            overflow_y: Overflow::Visible,
            text_align: TextAlign::Left,
            style: Style::default(),
            data: HashMap::new(),
            parent: None,
            children: Vec::new(),
            scroll_top: 0,
            client_width: 0,
            client_height: 0,
        }
    }
}

impl Element {
    pub fn box_() -> Self {
        Self {
            id: generate_id("box"),
            ..Default::default()
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            id: generate_id("text"),
            text: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn col() -> Self {
        Self {
            id: generate_id("col"),
            direction: Direction::Column,
            ..Default::default()
        }
    }

    pub fn row() -> Self {
        Self {
            id: generate_id("row"),
            direction: Direction::Row,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn width(mut self, width: Size) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: Size) -> Self {
        self.height = height;
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn top(mut self, top: u64) -> Self {
        self.top = top;
        self
    }

    pub fn left(mut self, left: u64) -> Self {
        self.left = left;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn overflow_y(mut self, overflow: Overflow) -> Self {
        self.overflow_y = overflow;
        self
    }

    pub fn text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get_data(&self, key: &str) -> Option<&String> {
        self.data.get(key)
    }

    /// Parent handle, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Attached children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn scroll_top(&self) -> u64 {
        self.scroll_top
    }

    /// Size computed by the last layout pass, as `(width, height)`.
    pub fn client_size(&self) -> (u64, u64) {
        (self.client_width, self.client_height)
    }
}
