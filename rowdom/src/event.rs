//! Scroll listeners, resize observers and animation frames.
//!
//! Nothing here calls back into user code. Notifications are queued on the
//! [`Dom`] and the host drains them with [`Dom::drain_events`], routing each
//! event to whichever component registered the listener, observer or frame.

use crate::element::{Dom, NodeId};
use crate::error::DomError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

/// A pending "run on next frame" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

/// Notifications produced by the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomEvent {
    /// The scroll offset of `node` changed.
    Scroll {
        listener: ListenerId,
        node: NodeId,
        scroll_top: u64,
    },
    /// The client size of `node` changed.
    Resize {
        observer: ObserverId,
        node: NodeId,
        width: u64,
        height: u64,
    },
    /// A requested frame is due.
    AnimationFrame { handle: FrameHandle },
}

impl Dom {
    fn allocate_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    pub fn add_scroll_listener(&mut self, node: NodeId) -> Result<ListenerId, DomError> {
        if !self.contains(node) {
            return Err(DomError::NodeNotFound(node));
        }
        let id = ListenerId(self.allocate_handle());
        self.scroll_listeners.insert(id, node);
        Ok(id)
    }

    /// Remove a listener and any of its events still queued.
    /// Returns false if it was not registered.
    pub fn remove_scroll_listener(&mut self, id: ListenerId) -> bool {
        self.events.retain(
            |e| !matches!(e, DomEvent::Scroll { listener, .. } if *listener == id),
        );
        self.scroll_listeners.remove(&id).is_some()
    }

    pub fn observe_resize(&mut self, node: NodeId) -> Result<ObserverId, DomError> {
        if !self.contains(node) {
            return Err(DomError::NodeNotFound(node));
        }
        let id = ObserverId(self.allocate_handle());
        self.resize_observers.insert(id, node);
        Ok(id)
    }

    /// Disconnect an observer and drop any of its events still queued.
    pub fn disconnect_observer(&mut self, id: ObserverId) -> bool {
        self.events.retain(
            |e| !matches!(e, DomEvent::Resize { observer, .. } if *observer == id),
        );
        self.resize_observers.remove(&id).is_some()
    }

    pub fn request_animation_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.allocate_handle());
        self.pending_frames.insert(handle);
        handle
    }

    /// Cancel a frame whether it is still pending or already queued.
    pub fn cancel_animation_frame(&mut self, handle: FrameHandle) -> bool {
        let queued = self.events.len();
        self.events.retain(
            |e| !matches!(e, DomEvent::AnimationFrame { handle: h } if *h == handle),
        );
        self.pending_frames.remove(&handle) || self.events.len() != queued
    }

    pub fn has_pending_frames(&self) -> bool {
        !self.pending_frames.is_empty()
    }

    /// Advance one frame tick: every pending frame request becomes an
    /// [`DomEvent::AnimationFrame`]. Requests made while handling those
    /// events wait for the next tick.
    ///
    /// Returns the number of frames fired.
    pub fn advance_frame(&mut self) -> usize {
        let due = std::mem::take(&mut self.pending_frames);
        let count = due.len();
        self.events
            .extend(due.into_iter().map(|handle| DomEvent::AnimationFrame { handle }));
        count
    }

    /// Queue a scroll notification for every listener on `node` without
    /// changing its offset.
    pub fn dispatch_scroll(&mut self, node: NodeId) -> Result<(), DomError> {
        let top = self
            .get(node)
            .ok_or(DomError::NodeNotFound(node))?
            .scroll_top();
        self.notify_scroll(node, top);
        Ok(())
    }

    pub(crate) fn notify_scroll(&mut self, node: NodeId, scroll_top: u64) {
        let listeners: Vec<ListenerId> = self
            .scroll_listeners
            .iter()
            .filter(|(_, n)| **n == node)
            .map(|(id, _)| *id)
            .collect();
        for listener in listeners {
            self.events.push_back(DomEvent::Scroll {
                listener,
                node,
                scroll_top,
            });
        }
    }

    pub(crate) fn notify_resize(&mut self, node: NodeId, width: u64, height: u64) {
        let observers: Vec<ObserverId> = self
            .resize_observers
            .iter()
            .filter(|(_, n)| **n == node)
            .map(|(id, _)| *id)
            .collect();
        for observer in observers {
            self.events.push_back(DomEvent::Resize {
                observer,
                node,
                width,
                height,
            });
        }
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Take all queued events in the order they were produced.
    pub fn drain_events(&mut self) -> Vec<DomEvent> {
        self.events.drain(..).collect()
    }
}
