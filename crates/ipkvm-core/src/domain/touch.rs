//! Touch gesture adapter.
//!
//! Maps one- and two-finger touch sequences onto the relative mouse channel.
//! The number of fingers picks a synthetic button (one finger is left, two
//! fingers is right) and the machine mirrors the relative mouse rules: a tap
//! without movement latches a click, and touching down again shortly after
//! lifting holds the button for a drag.
//!
//! Only the first finger's motion is tracked.  A second finger changes the
//! asserted button, never the cursor.

use serde::{Deserialize, Serialize};

use super::gesture::GestureConfig;
use super::pointer::{PointerSample, VideoBounds};
use crate::protocol::frame::{Frame, RelativeMouseFrame};
use crate::protocol::messages::{ButtonMask, DELTA_MAX};

/// One contact point, as a pixel offset inside the video element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

/// Synthetic button for a given number of simultaneous contacts.
pub fn touch_button(contacts: usize) -> ButtonMask {
    match contacts {
        1 => ButtonMask::LEFT,
        2 => ButtonMask::RIGHT,
        _ => ButtonMask::NONE,
    }
}

#[derive(Debug, Clone, Copy)]
struct Contact {
    start: PointerSample,
    last: PointerSample,
    moved: bool,
}

/// Touch state machine feeding the relative mouse channel.
#[derive(Debug, Clone)]
pub struct TouchGesture {
    config: GestureConfig,
    bounds: VideoBounds,
    contact: Option<Contact>,
    touch_type: ButtonMask,
    held: bool,
    last_end_ms: Option<u64>,
}

impl TouchGesture {
    pub fn new(config: GestureConfig, bounds: VideoBounds) -> Self {
        Self {
            config,
            bounds,
            contact: None,
            touch_type: ButtonMask::NONE,
            held: false,
            last_end_ms: None,
        }
    }

    pub fn set_bounds(&mut self, bounds: VideoBounds) {
        self.bounds = bounds;
    }

    /// `true` between the first `start` and the final `end`.
    pub fn is_active(&self) -> bool {
        self.contact.is_some()
    }

    /// Button currently asserted by the contact count.
    pub fn touch_type(&self) -> ButtonMask {
        self.touch_type
    }

    /// Whether the current contact began within the double-tap window.
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// A finger touched down.  `touches` lists every finger now on the surface.
    pub fn start(&mut self, touches: &[TouchPoint], time_ms: u64) -> Vec<Frame> {
        self.touch_type = touch_button(touches.len());
        if self.contact.is_some() {
            return Vec::new();
        }
        let Some(first) = touches.first() else {
            return Vec::new();
        };

        let pos = self.resolve(first);
        self.held = self.last_end_ms.is_some_and(|end| {
            time_ms >= end && time_ms - end <= self.config.double_click_ms
        });
        self.contact = Some(Contact {
            start: pos,
            last: pos,
            moved: false,
        });
        tracing::trace!(?pos, held = self.held, "touch start");
        Vec::new()
    }

    /// Fingers moved.  Only single-finger motion produces frames.
    pub fn motion(&mut self, touches: &[TouchPoint]) -> Vec<Frame> {
        let [only] = touches else {
            return Vec::new();
        };
        let pos = self.resolve(only);
        let buttons = if self.held {
            self.touch_type
        } else {
            ButtonMask::NONE
        };
        let Some(contact) = self.contact.as_mut() else {
            return Vec::new();
        };

        let (dx, dy) = pos.delta_from(contact.last, DELTA_MAX);
        contact.last = pos;
        if pos != contact.start {
            contact.moved = true;
        }
        vec![RelativeMouseFrame {
            buttons,
            dx,
            dy,
            wheel: 0,
        }
        .into()]
    }

    /// A finger lifted.  `touches` lists the fingers still on the surface; the
    /// gesture ends only when none remain.
    ///
    /// Any motion since the start cancels the tap latch, even if the finger
    /// came back to where it began.  The mouse machine instead compares the
    /// release position with the press position.
    pub fn end(&mut self, touches: &[TouchPoint], time_ms: u64) -> Vec<Frame> {
        if !touches.is_empty() {
            return Vec::new();
        }
        let Some(contact) = self.contact.take() else {
            return Vec::new();
        };

        let mut frames = Vec::with_capacity(2);
        if !contact.moved {
            frames.push(RelativeMouseFrame::buttons_only(self.touch_type).into());
        }
        self.touch_type = ButtonMask::NONE;
        self.held = false;
        self.last_end_ms = Some(time_ms);
        frames.push(RelativeMouseFrame::buttons_only(ButtonMask::NONE).into());
        frames
    }

    /// Drops any contact in progress and the double-tap history.
    pub fn reset(&mut self) {
        self.contact = None;
        self.touch_type = ButtonMask::NONE;
        self.held = false;
        self.last_end_ms = None;
    }

    fn resolve(&self, point: &TouchPoint) -> PointerSample {
        self.bounds
            .resolve(point.x, point.y, self.config.resize_range)
    }
}
