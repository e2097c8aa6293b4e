//! Coalescing render scheduler.
//!
//! Renders triggered by scroll and resize are deferred to the next frame.
//! The scheduler holds a single slot: triggers that arrive while a frame is
//! already pending are dropped, so at most one render runs per frame no
//! matter how many events arrive.

use rowdom::{Dom, FrameHandle};

/// Something that can run work on the next frame.
pub trait FrameSource {
    fn request_frame(&mut self) -> FrameHandle;

    /// Returns false if the frame had already fired or was unknown.
    fn cancel_frame(&mut self, handle: FrameHandle) -> bool;
}

impl FrameSource for Dom {
    fn request_frame(&mut self) -> FrameHandle {
        self.request_animation_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        self.cancel_animation_frame(handle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Scheduled(FrameHandle),
}

#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    state: RenderState,
    /// Triggers dropped because a frame was already pending.
    coalesced: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, RenderState::Scheduled(_))
    }

    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Idle → scheduled. Returns true if a frame was requested, false if
    /// the trigger was folded into the pending one.
    pub fn schedule(&mut self, frames: &mut impl FrameSource) -> bool {
        match self.state {
            RenderState::Idle => {
                self.state = RenderState::Scheduled(frames.request_frame());
                true
            }
            RenderState::Scheduled(_) => {
                self.coalesced += 1;
                false
            }
        }
    }

    /// Consume a fired frame. Returns true (and goes idle) only if `handle`
    /// is the frame this scheduler is waiting for.
    pub fn take_if(&mut self, handle: FrameHandle) -> bool {
        if self.state == RenderState::Scheduled(handle) {
            self.state = RenderState::Idle;
            true
        } else {
            false
        }
    }

    /// Cancel the pending frame, if any.
    pub fn cancel(&mut self, frames: &mut impl FrameSource) -> bool {
        match std::mem::take(&mut self.state) {
            RenderState::Scheduled(handle) => frames.cancel_frame(handle),
            RenderState::Idle => false,
        }
    }
}
