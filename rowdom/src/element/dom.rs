use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{Element, NodeId};
use crate::error::DomError;
use crate::event::{DomEvent, FrameHandle, ListenerId, ObserverId};
use crate::text::display_width;
use crate::types::{Direction, Position, Size};

/// One arena slot. `generation` is bumped every time the slot is freed.
#[derive(Debug)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// Arena of elements plus the event plumbing hosts observe them through.
///
/// Layout is incremental: attaching a node or changing its size lays out
/// that node's subtree against its parent's client size. Auto-sized
/// ancestors are re-measured only when they are laid out themselves.
/// Scroll offsets are re-clamped whenever layout shrinks what a node can
/// scroll over.
#[derive(Debug, Default)]
pub struct Dom {
    slots: Vec<Slot>,
    free: Vec<usize>,
    pub(crate) scroll_listeners: BTreeMap<ListenerId, NodeId>,
    pub(crate) resize_observers: BTreeMap<ObserverId, NodeId>,
    pub(crate) pending_frames: BTreeSet<FrameHandle>,
    pub(crate) events: VecDeque<DomEvent>,
    pub(crate) next_handle: u64,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a detached element and return its handle. Slots freed by
    /// [`Dom::remove`] are reused under a new generation.
    pub fn create(&mut self, mut element: Element) -> NodeId {
        element.parent = None;
        element.children.clear();
        element.scroll_top = 0;
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.element = Some(element);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    element: Some(element),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        };
        self.layout_subtree(id, None);
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    /// Mutable access to an element.
    ///
    /// Changes to sizing fields take effect on the next [`Dom::relayout`].
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Slots allocated so far, live or free.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn node(&self, id: NodeId) -> Result<&Element, DomError> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Element, DomError> {
        self.get_mut(id).ok_or(DomError::NodeNotFound(id))
    }

    /// Children of `id`, empty if the node does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|el| el.children()).unwrap_or(&[])
    }

    // -------------------------------------------------------------------------
    // Tree mutation
    // -------------------------------------------------------------------------

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.get(node).and_then(Element::parent);
        }
        false
    }

    /// Attach `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        if self.is_ancestor(child, parent) {
            return Err(DomError::Cycle { parent, child });
        }
        if let Some(old_parent) = self.node(child)?.parent {
            self.remove_child(old_parent, child)?;
        }
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        self.relayout(child)
    }

    /// Detach `child` from `parent`. The child stays alive in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let el = self.node_mut(parent)?;
        let pos = el
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild { parent, child })?;
        el.children.remove(pos);
        self.node_mut(child)?.parent = None;
        self.clamp_ancestors(parent);
        Ok(())
    }

    /// Detach every child of `parent`.
    pub fn clear_children(&mut self, parent: NodeId) -> Result<(), DomError> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for child in children {
            if let Some(el) = self.get_mut(child) {
                el.parent = None;
            }
        }
        self.clamp_ancestors(parent);
        Ok(())
    }

    /// Free `id` and its whole subtree. Listeners and observers on freed
    /// nodes are dropped together with their queued events.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        if let Some(parent) = self.node(id)?.parent {
            self.remove_child(parent, id)?;
        }

        let mut freed = 0usize;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(next.index)
                .filter(|slot| slot.generation == next.generation)
            else {
                continue;
            };
            if let Some(el) = slot.element.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(next.index);
                stack.extend(el.children);
                freed += 1;
            }
        }

        let listeners = self.scroll_listeners.len();
        let observers = self.resize_observers.len();
        let queued = self.events.len();
        let slots = &self.slots;
        let alive = |n: &NodeId| {
            slots
                .get(n.index)
                .is_some_and(|slot| slot.generation == n.generation && slot.element.is_some())
        };
        self.scroll_listeners.retain(|_, node| alive(node));
        self.resize_observers.retain(|_, node| alive(node));
        self.events.retain(|event| match event {
            DomEvent::Scroll { node, .. } | DomEvent::Resize { node, .. } => alive(node),
            DomEvent::AnimationFrame { .. } => true,
        });

        let dropped = (
            listeners - self.scroll_listeners.len(),
            observers - self.resize_observers.len(),
            queued - self.events.len(),
        );
        if dropped != (0, 0, 0) {
            log::debug!(
                "[Dom::remove] {id}: freed {freed} nodes, dropped {} listeners, {} observers, {} queued events",
                dropped.0,
                dropped.1,
                dropped.2
            );
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    pub fn set_top(&mut self, id: NodeId, top: u64) -> Result<(), DomError> {
        let el = self.node_mut(id)?;
        el.top = top;
        if let Some(parent) = el.parent {
            self.clamp_ancestors(parent);
        }
        Ok(())
    }

    pub fn set_height(&mut self, id: NodeId, height: Size) -> Result<(), DomError> {
        self.node_mut(id)?.height = height;
        self.relayout(id)
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        self.node_mut(id)?.text = Some(text.into());
        self.relayout(id)
    }

    /// Give a node a fixed client size, e.g. when the host window changes.
    /// `Fill` descendants follow and observers of every changed node are
    /// notified.
    pub fn resize(&mut self, id: NodeId, width: u64, height: u64) -> Result<(), DomError> {
        let el = self.node_mut(id)?;
        el.width = Size::Fixed(width);
        el.height = Size::Fixed(height);
        self.relayout(id)
    }

    /// Lay out `id` and its subtree against its parent's client size.
    pub fn relayout(&mut self, id: NodeId) -> Result<(), DomError> {
        let parent_size = match self.node(id)?.parent {
            Some(parent) => Some(self.node(parent)?.client_size()),
            None => None,
        };
        self.layout_subtree(id, parent_size);
        if let Some(parent) = self.node(id)?.parent {
            self.clamp_ancestors(parent);
        }
        Ok(())
    }

    fn layout_subtree(&mut self, id: NodeId, parent_size: Option<(u64, u64)>) {
        let Some(el) = self.get(id) else {
            return;
        };
        let old_size = el.client_size();
        let text_width = el.text.as_deref().map(|t| display_width(t) as u64);

        let width = match el.width {
            Size::Fixed(w) => w,
            Size::Fill => parent_size.map_or(old_size.0, |p| p.0),
            Size::Auto => text_width.unwrap_or_else(|| parent_size.map_or(old_size.0, |p| p.0)),
        };
        let mut height = match el.height {
            Size::Fixed(h) => h,
            Size::Fill => parent_size.map_or(old_size.1, |p| p.1),
            Size::Auto if el.text.is_some() => 1,
            Size::Auto => 0,
        };
        let measure_children = el.height == Size::Auto && el.text.is_none();
        let children = el.children.clone();

        if let Some(el) = self.get_mut(id) {
            el.client_width = width;
            el.client_height = height;
        }
        for child in children {
            self.layout_subtree(child, Some((width, height)));
        }
        if measure_children {
            height = self.flow_extent(id);
            if let Some(el) = self.get_mut(id) {
                el.client_height = height;
            }
        }

        self.clamp_scroll(id);
        if (width, height) != old_size {
            self.notify_resize(id, width, height);
        }
    }

    /// Pull `id` back inside its scroll range, notifying listeners if the
    /// offset moved.
    fn clamp_scroll(&mut self, id: NodeId) {
        let max = self.max_scroll_top(id);
        let Some(el) = self.get_mut(id) else {
            return;
        };
        if el.scroll_top <= max {
            return;
        }
        log::trace!("[Dom] {id}: scroll_top {} clamped to {max}", el.scroll_top);
        el.scroll_top = max;
        self.notify_scroll(id, max);
    }

    /// Re-clamp `id` and every ancestor, whose scroll extent may have
    /// shrunk with a descendant.
    fn clamp_ancestors(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(node) = current {
            self.clamp_scroll(node);
            current = self.get(node).and_then(Element::parent);
        }
    }

    /// Extent of static children along the vertical axis.
    fn flow_extent(&self, id: NodeId) -> u64 {
        let Some(el) = self.get(id) else {
            return 0;
        };
        let statics = el
            .children
            .iter()
            .filter_map(|&c| self.get(c))
            .filter(|c| c.position == Position::Static)
            .map(|c| c.client_height);
        match el.direction {
            Direction::Column => statics.sum(),
            Direction::Row => statics.max().unwrap_or(0),
        }
    }

    pub fn client_size(&self, id: NodeId) -> Option<(u64, u64)> {
        self.get(id).map(Element::client_size)
    }

    /// Total scrollable extent of `id`: the furthest child edge, and never
    /// less than its own client height.
    pub fn scroll_height(&self, id: NodeId) -> u64 {
        let Some(el) = self.get(id) else {
            return 0;
        };
        let absolute = el
            .children
            .iter()
            .filter_map(|&c| self.get(c))
            .filter(|c| c.position == Position::Absolute)
            .map(|c| c.top.saturating_add(c.client_height))
            .max()
            .unwrap_or(0);
        el.client_height.max(self.flow_extent(id)).max(absolute)
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    pub fn scroll_top(&self, id: NodeId) -> u64 {
        self.get(id).map_or(0, Element::scroll_top)
    }

    /// Largest valid scroll offset for `id`.
    pub fn max_scroll_top(&self, id: NodeId) -> u64 {
        let client = self.get(id).map_or(0, |el| el.client_height);
        self.scroll_height(id).saturating_sub(client)
    }

    /// Scroll `id` to `top`, clamped to the valid range. Listeners are
    /// notified only when the offset actually changes.
    ///
    /// Returns the applied offset.
    pub fn set_scroll_top(&mut self, id: NodeId, top: u64) -> Result<u64, DomError> {
        let top = top.min(self.max_scroll_top(id));
        let el = self.node_mut(id)?;
        if el.scroll_top == top {
            return Ok(top);
        }
        el.scroll_top = top;
        self.notify_scroll(id, top);
        Ok(top)
    }

    /// Scroll by a signed delta (positive = down).
    pub fn scroll_by(&mut self, id: NodeId, delta: i64) -> Result<u64, DomError> {
        let current = self.node(id)?.scroll_top;
        let target = current.saturating_add_signed(delta);
        self.set_scroll_top(id, target)
    }
}
