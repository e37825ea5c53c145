//! Fixed-size binary frames for the three input channels.
//!
//! Wire formats:
//! ```text
//! keyboard      [0x00][hid:1][status:1]                                  3 bytes
//! mouse         [buttons:1][x_lo][x_hi&0x7F][y_lo][y_hi&0x7F][wheel:i8]  6 bytes
//! mouse_legacy  [buttons:1][dx:i8][dy:i8][wheel:i8]                      4 bytes
//! ```
//! Multi-byte coordinates are little-endian.  Bit 7 of each coordinate's high
//! byte is reserved and always clear.
//!
//! Encoding never fails.  Every numeric field is clamped into its range
//! first, so a misbehaving caller produces a saturated frame, not a wrapped one.

use crate::keymap::hid::HidKeyCode;
use crate::protocol::messages::{
    ButtonMask, ChannelKind, KeyStatus, ABSOLUTE_FRAME_LEN, ABS_MAX, DELTA_MAX,
    KEYBOARD_FRAME_LEN, RELATIVE_FRAME_LEN, WHEEL_MAX,
};

/// Host wheel units per protocol wheel step.
pub const WHEEL_UNITS_PER_STEP: f64 = 80.0;

// ── Frame values ──────────────────────────────────────────────────────────────

/// A key transition on the keyboard channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardFrame {
    pub key: HidKeyCode,
    pub status: KeyStatus,
}

/// A pointer report on the absolute mouse channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbsoluteMouseFrame {
    pub buttons: ButtonMask,
    /// `0..=0x7FFF`; larger values are clamped when encoded.
    pub x: u16,
    pub y: u16,
    pub wheel: i32,
}

/// A pointer report on the relative (legacy) mouse channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelativeMouseFrame {
    pub buttons: ButtonMask,
    pub dx: i32,
    pub dy: i32,
    pub wheel: i32,
}

impl RelativeMouseFrame {
    /// A frame that reports only button state.
    pub fn buttons_only(buttons: ButtonMask) -> Self {
        Self {
            buttons,
            dx: 0,
            dy: 0,
            wheel: 0,
        }
    }
}

/// Any frame the translation layer can emit, tagged with its channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    Keyboard(KeyboardFrame),
    Absolute(AbsoluteMouseFrame),
    Relative(RelativeMouseFrame),
}

impl Frame {
    /// The channel this frame must be sent on.
    pub fn channel(&self) -> ChannelKind {
        match self {
            Frame::Keyboard(_) => ChannelKind::Keyboard,
            Frame::Absolute(_) => ChannelKind::Mouse,
            Frame::Relative(_) => ChannelKind::MouseLegacy,
        }
    }

    /// Serializes the frame into its wire bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Frame::Keyboard(f) => encode_keyboard(f).to_vec(),
            Frame::Absolute(f) => encode_absolute(f).to_vec(),
            Frame::Relative(f) => encode_relative(f).to_vec(),
        }
    }
}

impl From<KeyboardFrame> for Frame {
    fn from(f: KeyboardFrame) -> Self {
        Frame::Keyboard(f)
    }
}

impl From<AbsoluteMouseFrame> for Frame {
    fn from(f: AbsoluteMouseFrame) -> Self {
        Frame::Absolute(f)
    }
}

impl From<RelativeMouseFrame> for Frame {
    fn from(f: RelativeMouseFrame) -> Self {
        Frame::Relative(f)
    }
}

// ── Encoders ──────────────────────────────────────────────────────────────────

/// Encodes a keyboard frame.
///
/// # Examples
///
/// ```rust
/// use ipkvm_core::keymap::HidKeyCode;
/// use ipkvm_core::protocol::frame::{encode_keyboard, KeyboardFrame};
/// use ipkvm_core::protocol::messages::KeyStatus;
///
/// let bytes = encode_keyboard(&KeyboardFrame { key: HidKeyCode::KeyA, status: KeyStatus::Down });
/// assert_eq!(bytes, [0x00, 0x04, 0x01]);
/// ```
pub fn encode_keyboard(frame: &KeyboardFrame) -> [u8; KEYBOARD_FRAME_LEN] {
    [0x00, frame.key.as_u8(), frame.status as u8]
}

/// Encodes an absolute mouse frame.
pub fn encode_absolute(frame: &AbsoluteMouseFrame) -> [u8; ABSOLUTE_FRAME_LEN] {
    let [x_lo, x_hi] = frame.x.min(ABS_MAX).to_le_bytes();
    let [y_lo, y_hi] = frame.y.min(ABS_MAX).to_le_bytes();
    [
        frame.buttons.bits(),
        x_lo,
        x_hi & 0x7F,
        y_lo,
        y_hi & 0x7F,
        encode_wheel(frame.wheel),
    ]
}

/// Encodes a relative mouse frame.
///
/// The gesture layer keeps `dx`/`dy` within ±127; anything larger is
/// saturated here rather than wrapped.
pub fn encode_relative(frame: &RelativeMouseFrame) -> [u8; RELATIVE_FRAME_LEN] {
    [
        frame.buttons.bits(),
        clamp_i8(frame.dx, DELTA_MAX),
        clamp_i8(frame.dy, DELTA_MAX),
        encode_wheel(frame.wheel),
    ]
}

/// Clamps a wheel value to `[-127, 127]` and returns its two's-complement byte.
pub fn encode_wheel(wheel: i32) -> u8 {
    clamp_i8(wheel, WHEEL_MAX)
}

fn clamp_i8(value: i32, max: i32) -> u8 {
    (value.clamp(-max, max) as i8) as u8
}

// ── Numeric helpers ───────────────────────────────────────────────────────────

/// Scales a pixel offset inside an element of `extent` pixels to `0..=0x7FFF`.
///
/// `offset == extent` maps exactly to `0x7FFF` and `offset == 0` to `0`.
/// Offsets outside the element are clamped.  A degenerate extent (zero,
/// negative or NaN) maps everything to `0`.
pub fn scale_absolute(offset: f64, extent: f64) -> u16 {
    scale_into(offset, extent, ABS_MAX)
}

/// Scales a pixel offset inside an element of `extent` pixels to `0..=range`.
pub fn scale_into(offset: f64, extent: f64, range: u16) -> u16 {
    if !(extent > 0.0) || offset.is_nan() {
        return 0;
    }
    let scaled = (offset / extent * f64::from(range)).round();
    scaled.clamp(0.0, f64::from(range)) as u16
}

/// Converts a host wheel delta (DOM `WheelEvent.deltaY`) into wheel steps.
///
/// Scrolling down (positive `deltaY`) produces negative steps.  The result is
/// truncated toward zero and not yet clamped.
pub fn wheel_from_scroll(delta_y: f64) -> i32 {
    if delta_y.is_nan() {
        return 0;
    }
    let steps = (-delta_y / WHEEL_UNITS_PER_STEP).trunc();
    steps.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

// ── Tests ─────────────────────────────────────────────────────────────────────
