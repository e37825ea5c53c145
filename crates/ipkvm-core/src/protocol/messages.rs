//! Wire-level value types shared by the encoders and the channel layer.
//!
//! Nothing in here touches a socket.  These are the small, copyable values
//! that the gesture machines produce and the frame encoder consumes, plus the
//! names of the three channels the frames travel on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keymap::hid::HidKeyCode;

/// Length in bytes of a keyboard frame.
pub const KEYBOARD_FRAME_LEN: usize = 3;
/// Length in bytes of an absolute mouse frame.
pub const ABSOLUTE_FRAME_LEN: usize = 6;
/// Length in bytes of a relative (legacy) mouse frame.
pub const RELATIVE_FRAME_LEN: usize = 4;

/// Largest coordinate an absolute mouse frame can carry (15 bits).
pub const ABS_MAX: u16 = 0x7FFF;
/// Wheel values are clamped to this magnitude; -128 is never sent.
pub const WHEEL_MAX: i32 = 127;
/// Relative deltas are clamped to this magnitude before truncation to `i8`.
pub const DELTA_MAX: i32 = 127;

// ── Channels ──────────────────────────────────────────────────────────────────

/// One of the three independently reconnecting input channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    /// 3-byte key frames out, modifier/LED status in.
    Keyboard,
    /// 6-byte absolute mouse frames.
    Mouse,
    /// 4-byte relative mouse frames.
    MouseLegacy,
}

impl ChannelKind {
    /// All channels, in the order the console opens them.
    pub const ALL: [ChannelKind; 3] = [
        ChannelKind::Keyboard,
        ChannelKind::Mouse,
        ChannelKind::MouseLegacy,
    ];

    /// URL path of the channel's WebSocket endpoint on the remote side.
    pub fn path(self) -> &'static str {
        match self {
            ChannelKind::Keyboard => "/keyboard",
            ChannelKind::Mouse => "/mouse",
            ChannelKind::MouseLegacy => "/mouse_legacy",
        }
    }

    /// Fixed length of every frame sent on this channel.
    pub fn frame_len(self) -> usize {
        match self {
            ChannelKind::Keyboard => KEYBOARD_FRAME_LEN,
            ChannelKind::Mouse => ABSOLUTE_FRAME_LEN,
            ChannelKind::MouseLegacy => RELATIVE_FRAME_LEN,
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelKind::Keyboard => "keyboard",
            ChannelKind::Mouse => "mouse",
            ChannelKind::MouseLegacy => "mouse_legacy",
        };
        f.write_str(name)
    }
}

// ── Keyboard ──────────────────────────────────────────────────────────────────

/// Key transition carried in byte 2 of a keyboard frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum KeyStatus {
    Up = 0,
    Down = 1,
}

/// A single key transition, the unit the paste encoder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: HidKeyCode,
    pub status: KeyStatus,
}

impl KeyStroke {
    pub fn down(key: HidKeyCode) -> Self {
        Self {
            key,
            status: KeyStatus::Down,
        }
    }

    pub fn up(key: HidKeyCode) -> Self {
        Self {
            key,
            status: KeyStatus::Up,
        }
    }
}

/// LED usage ID of Caps Lock on the HID LED page.
pub const LED_CAPS_LOCK: u16 = 0x02;

/// Lock/LED state last reported by the remote keyboard.
///
/// The remote side pushes its LED bitmap on the keyboard channel whenever it
/// changes; bit `n` (little-endian across bytes) is LED usage `n`.  The length
/// is whatever the remote sent.  An empty status means "nothing reported
/// yet", which reads as every LED off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierStatus(Vec<u8>);

impl ModifierStatus {
    /// Wraps the raw bytes of an inbound keyboard-channel message verbatim.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the raw status bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns whether LED usage `led_id` is lit.  Out-of-range IDs read as off.
    pub fn led(&self, led_id: u16) -> bool {
        let idx = usize::from(led_id / 8);
        self.0
            .get(idx)
            .map(|byte| (byte >> (led_id % 8)) & 1 == 1)
            .unwrap_or(false)
    }

    /// Returns `true` if the remote Caps Lock is on.
    pub fn caps_lock(&self) -> bool {
        self.led(LED_CAPS_LOCK)
    }
}

// ── Mouse ─────────────────────────────────────────────────────────────────────

/// Bitmask of pressed mouse buttons, laid out like DOM `MouseEvent.buttons`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonMask(pub u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);
    pub const LEFT: ButtonMask = ButtonMask(0b001);
    pub const RIGHT: ButtonMask = ButtonMask(0b010);
    pub const MIDDLE: ButtonMask = ButtonMask(0b100);
    /// Everything except the left button.
    pub const NON_LEFT: ButtonMask = ButtonMask(0b110);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn left(self) -> bool {
        self.0 & Self::LEFT.0 != 0
    }

    /// Returns the mask with the left bit forced on.
    pub fn with_left(self) -> Self {
        ButtonMask(self.0 | Self::LEFT.0)
    }

    /// Returns only the bits that are also set in `other`.
    pub fn intersect(self, other: ButtonMask) -> Self {
        ButtonMask(self.0 & other.0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
