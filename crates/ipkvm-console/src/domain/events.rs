//! Host input events, as delivered on the console's event feed.
//!
//! The host (the page or shell that owns the video element) reports every raw
//! input event as one JSON object per line.  Coordinates are pixel offsets
//! inside the video element and every pointer event carries a millisecond
//! timestamp, so gesture timing never depends on when the console reads it.
//!
//! # JSON discriminant
//!
//! Every message has a `"type"` field naming the variant in snake_case:
//!
//! ```json
//! {"type":"key_down","code":"KeyA"}
//! {"type":"mouse_move","buttons":1,"x":412.5,"y":90,"time_ms":18250}
//! {"type":"wheel","x":10,"y":10,"delta_y":-240,"time_ms":18300}
//! {"type":"touch_start","touches":[{"x":100,"y":80}],"time_ms":19000}
//! {"type":"paste","text":"hello\n"}
//! {"type":"resize","width":1920,"height":1080}
//! {"type":"set_mode","relative":true}
//! ```

use ipkvm_core::{ButtonMask, PointerInput, TouchPoint};
use serde::{Deserialize, Serialize};

/// One raw input event from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// A key went down.  `code` is a DOM `KeyboardEvent.code` string.
    KeyDown { code: String },
    KeyUp { code: String },

    MouseDown(PointerEvent),
    MouseUp(PointerEvent),
    MouseMove(PointerEvent),

    /// Wheel rotation.  `delta_y` uses DOM units (positive scrolls down).
    Wheel {
        #[serde(flatten)]
        pointer: PointerEvent,
        delta_y: f64,
    },

    TouchStart(TouchEvent),
    TouchMove(TouchEvent),
    TouchEnd(TouchEvent),

    /// Text to type on the remote keyboard.
    Paste { text: String },

    /// The video element changed size.
    Resize { width: f64, height: f64 },

    /// The operator toggled relative (legacy) mouse mode.
    SetMode { relative: bool },
}

impl HostEvent {
    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::KeyDown { .. } => "key_down",
            HostEvent::KeyUp { .. } => "key_up",
            HostEvent::MouseDown(_) => "mouse_down",
            HostEvent::MouseUp(_) => "mouse_up",
            HostEvent::MouseMove(_) => "mouse_move",
            HostEvent::Wheel { .. } => "wheel",
            HostEvent::TouchStart(_) => "touch_start",
            HostEvent::TouchMove(_) => "touch_move",
            HostEvent::TouchEnd(_) => "touch_end",
            HostEvent::Paste { .. } => "paste",
            HostEvent::Resize { .. } => "resize",
            HostEvent::SetMode { .. } => "set_mode",
        }
    }
}

/// Button state and position of a mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// DOM `MouseEvent.buttons` after the event.
    #[serde(default)]
    pub buttons: ButtonMask,
    pub x: f64,
    pub y: f64,
    pub time_ms: u64,
}

impl From<PointerEvent> for PointerInput {
    fn from(e: PointerEvent) -> Self {
        PointerInput {
            buttons: e.buttons,
            x: e.x,
            y: e.y,
            time_ms: e.time_ms,
        }
    }
}

/// Contacts currently on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Every finger still touching after the event; empty on the final lift.
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
    pub time_ms: u64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
