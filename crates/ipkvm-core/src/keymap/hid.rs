//! USB HID Usage IDs (page 0x07, Keyboard/Keypad page).
//!
//! These are the codes carried in byte 1 of every keyboard frame.  The remote
//! side feeds them straight into its USB gadget report, so the values must be
//! the exact usage IDs from the HID Usage Tables.
//!
//! Reference: USB HID Usage Tables 1.3, Section 10 (Keyboard/Keypad page 0x07).
//!
//! # Why position codes and not characters?
//!
//! HID codes name **physical key positions**.  `KeyA` is 0x04 whether the
//! remote machine is configured for QWERTY, AZERTY or Dvorak.  The character
//! that actually appears is decided by the remote OS, which is why the paste
//! encoder in [`super::ascii`] has to reason about Shift and Caps Lock itself.
//!
//! # No sentinel
//!
//! There is deliberately no `Unknown` variant.  A raw value that is not in the
//! table converts to `None`; the caller decides what to do with it.  A frame
//! is never sent with a made-up code.

use serde::{Deserialize, Serialize};

/// USB HID Usage ID for keyboard keys (page 0x07).
///
/// The numeric value of each variant is its HID Usage ID on the keyboard/keypad page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HidKeyCode {
    // Letters (HID 0x04–0x1D)
    KeyA = 0x04,
    KeyB = 0x05,
    KeyC = 0x06,
    KeyD = 0x07,
    KeyE = 0x08,
    KeyF = 0x09,
    KeyG = 0x0A,
    KeyH = 0x0B,
    KeyI = 0x0C,
    KeyJ = 0x0D,
    KeyK = 0x0E,
    KeyL = 0x0F,
    KeyM = 0x10,
    KeyN = 0x11,
    KeyO = 0x12,
    KeyP = 0x13,
    KeyQ = 0x14,
    KeyR = 0x15,
    KeyS = 0x16,
    KeyT = 0x17,
    KeyU = 0x18,
    KeyV = 0x19,
    KeyW = 0x1A,
    KeyX = 0x1B,
    KeyY = 0x1C,
    KeyZ = 0x1D,

    // Digits (HID 0x1E–0x27)
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    // Control keys (HID 0x28–0x38)
    Enter = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equal = 0x2E,
    BracketLeft = 0x2F,
    BracketRight = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Quote = 0x34,
    Backquote = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,

    // Lock keys
    CapsLock = 0x39,

    // Function keys (HID 0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (HID 0x46–0x52)
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    ArrowRight = 0x4F,
    ArrowLeft = 0x50,
    ArrowDown = 0x51,
    ArrowUp = 0x52,

    // Keypad
    NumpadEnter = 0x58,

    // Modifier keys (HID 0xE0–0xE7)
    ControlLeft = 0xE0,
    ShiftLeft = 0xE1,
    AltLeft = 0xE2,
    MetaLeft = 0xE3,
    ControlRight = 0xE4,
    ShiftRight = 0xE5,
    AltRight = 0xE6,
    MetaRight = 0xE7,
}

impl HidKeyCode {
    /// Every variant, in ascending usage-ID order.
    pub const ALL: [HidKeyCode; 87] = [
        HidKeyCode::KeyA,
        HidKeyCode::KeyB,
        HidKeyCode::KeyC,
        HidKeyCode::KeyD,
        HidKeyCode::KeyE,
        HidKeyCode::KeyF,
        HidKeyCode::KeyG,
        HidKeyCode::KeyH,
        HidKeyCode::KeyI,
        HidKeyCode::KeyJ,
        HidKeyCode::KeyK,
        HidKeyCode::KeyL,
        HidKeyCode::KeyM,
        HidKeyCode::KeyN,
        HidKeyCode::KeyO,
        HidKeyCode::KeyP,
        HidKeyCode::KeyQ,
        HidKeyCode::KeyR,
        HidKeyCode::KeyS,
        HidKeyCode::KeyT,
        HidKeyCode::KeyU,
        HidKeyCode::KeyV,
        HidKeyCode::KeyW,
        HidKeyCode::KeyX,
        HidKeyCode::KeyY,
        HidKeyCode::KeyZ,
        HidKeyCode::Digit1,
        HidKeyCode::Digit2,
        HidKeyCode::Digit3,
        HidKeyCode::Digit4,
        HidKeyCode::Digit5,
        HidKeyCode::Digit6,
        HidKeyCode::Digit7,
        HidKeyCode::Digit8,
        HidKeyCode::Digit9,
        HidKeyCode::Digit0,
        HidKeyCode::Enter,
        HidKeyCode::Escape,
        HidKeyCode::Backspace,
        HidKeyCode::Tab,
        HidKeyCode::Space,
        HidKeyCode::Minus,
        HidKeyCode::Equal,
        HidKeyCode::BracketLeft,
        HidKeyCode::BracketRight,
        HidKeyCode::Backslash,
        HidKeyCode::Semicolon,
        HidKeyCode::Quote,
        HidKeyCode::Backquote,
        HidKeyCode::Comma,
        HidKeyCode::Period,
        HidKeyCode::Slash,
        HidKeyCode::CapsLock,
        HidKeyCode::F1,
        HidKeyCode::F2,
        HidKeyCode::F3,
        HidKeyCode::F4,
        HidKeyCode::F5,
        HidKeyCode::F6,
        HidKeyCode::F7,
        HidKeyCode::F8,
        HidKeyCode::F9,
        HidKeyCode::F10,
        HidKeyCode::F11,
        HidKeyCode::F12,
        HidKeyCode::PrintScreen,
        HidKeyCode::ScrollLock,
        HidKeyCode::Pause,
        HidKeyCode::Insert,
        HidKeyCode::Home,
        HidKeyCode::PageUp,
        HidKeyCode::Delete,
        HidKeyCode::End,
        HidKeyCode::PageDown,
        HidKeyCode::ArrowRight,
        HidKeyCode::ArrowLeft,
        HidKeyCode::ArrowDown,
        HidKeyCode::ArrowUp,
        HidKeyCode::NumpadEnter,
        HidKeyCode::ControlLeft,
        HidKeyCode::ShiftLeft,
        HidKeyCode::AltLeft,
        HidKeyCode::MetaLeft,
        HidKeyCode::ControlRight,
        HidKeyCode::ShiftRight,
        HidKeyCode::AltRight,
        HidKeyCode::MetaRight,
    ];

    /// Converts a raw HID Usage ID to a [`HidKeyCode`].
    ///
    /// Returns `None` if the value is not one of the keys this table knows.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|code| code.as_u8() == value)
    }

    /// Returns the raw USB HID Usage ID value for this key code.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

}
