//! Paste support: turns a string of printable ASCII into HID key strokes.
//!
//! # How a character becomes key presses (for beginners)
//!
//! A US keyboard can type every printable ASCII character, but about half of
//! them need Shift held down (`A`, `!`, `{` …).  The table below stores a
//! *signed* HID code per character: a negative entry means "press Shift
//! first".  `'a'` is `+0x04`, `'A'` is `-0x04`, `'1'` is `+0x1E` and `'!'`
//! is `-0x1E`.
//!
//! Caps Lock complicates letters only.  When the remote machine has Caps Lock
//! on, typing `a` without Shift produces `A`, so the encoder flips the Shift
//! decision for letters.  Digits and punctuation are not affected by Caps Lock
//! on a real keyboard, so they are never flipped.
//!
//! Whitespace (tab, newline, space) is sent without Shift.

use thiserror::Error;

use super::hid::HidKeyCode;
use crate::protocol::messages::{KeyStroke, ModifierStatus};

/// The modifier pressed around shifted characters.
pub const SHIFT_KEY: HidKeyCode = HidKeyCode::ShiftLeft;

/// Errors produced by [`encode_text`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsciiError {
    /// The text contains a character with no key on a US keyboard.
    ///
    /// `index` is the character position in the text after `"\r\n"` has been
    /// folded to `"\n"`.
    #[error("character {ch:?} at position {index} cannot be typed")]
    UnsupportedCharacter { ch: char, index: usize },
}

/// Signed HID code for printable ASCII `0x20..=0x7E`, indexed by `byte - 0x20`.
///
/// Zero never appears; every printable character is typeable.
const PRINTABLE: [i16; 95] = [
    0x2C,  // ' '
    -0x1E, // !
    -0x34, // "
    -0x20, // #
    -0x21, // $
    -0x22, // %
    -0x24, // &
    0x34,  // '
    -0x26, // (
    -0x27, // )
    -0x25, // *
    -0x2E, // +
    0x36,  // ,
    0x2D,  // -
    0x37,  // .
    0x38,  // /
    0x27, 0x1E, 0x1F, 0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, // 0-9
    -0x33, // :
    0x33,  // ;
    -0x36, // <
    0x2E,  // =
    -0x37, // >
    -0x38, // ?
    -0x1F, // @
    -0x04, -0x05, -0x06, -0x07, -0x08, -0x09, -0x0A, -0x0B, -0x0C, -0x0D, -0x0E, -0x0F,
    -0x10, -0x11, -0x12, -0x13, -0x14, -0x15, -0x16, -0x17, -0x18, -0x19, -0x1A, -0x1B,
    -0x1C, -0x1D, // A-Z
    0x2F,  // [
    0x31,  // backslash
    0x30,  // ]
    -0x23, // ^
    -0x2D, // _
    0x35,  // `
    0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11,
    0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, // a-z
    -0x2F, // {
    -0x31, // |
    -0x30, // }
    -0x35, // ~
];

/// How one character is typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Chord {
    key: HidKeyCode,
    shift: bool,
}

fn chord_for(ch: char) -> Option<Chord> {
    let signed = match ch {
        '\t' => i16::from(HidKeyCode::Tab.as_u8()),
        '\n' | '\r' => i16::from(HidKeyCode::Enter.as_u8()),
        ' '..='~' => PRINTABLE[(ch as usize) - 0x20],
        _ => return None,
    };
    let key = u8::try_from(signed.unsigned_abs())
        .ok()
        .and_then(HidKeyCode::from_u8)?;
    Some(Chord {
        key,
        shift: signed < 0,
    })
}

/// Encodes `text` as the key strokes that type it on the remote machine.
///
/// `"\r\n"` pairs are folded to a single Enter.  The whole text is validated
/// before anything is produced: if any character cannot be typed the result
/// is an error and no strokes are returned, so a paste is never half-sent.
///
/// # Examples
///
/// ```rust
/// use ipkvm_core::keymap::ascii::encode_text;
/// use ipkvm_core::keymap::HidKeyCode;
/// use ipkvm_core::protocol::messages::ModifierStatus;
///
/// let strokes = encode_text("a", &ModifierStatus::default()).unwrap();
/// assert_eq!(strokes.len(), 2);
/// assert_eq!(strokes[0].key, HidKeyCode::KeyA);
/// ```
pub fn encode_text(text: &str, status: &ModifierStatus) -> Result<Vec<KeyStroke>, AsciiError> {
    let normalized = text.replace("\r\n", "\n");

    let chords = normalized
        .chars()
        .enumerate()
        .map(|(index, ch)| {
            chord_for(ch)
                .map(|chord| (ch, chord))
                .ok_or(AsciiError::UnsupportedCharacter { ch, index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let caps_lock = status.caps_lock();
    let mut strokes = Vec::with_capacity(chords.len() * 4);
    for (ch, chord) in chords {
        let shift = if ch.is_ascii_whitespace() {
            false
        } else {
            chord.shift ^ (caps_lock && ch.is_ascii_alphabetic())
        };

        if shift {
            strokes.push(KeyStroke::down(SHIFT_KEY));
        }
        strokes.push(KeyStroke::down(chord.key));
        strokes.push(KeyStroke::up(chord.key));
        if shift {
            strokes.push(KeyStroke::up(SHIFT_KEY));
        }
    }

    tracing::trace!(chars = normalized.len(), strokes = strokes.len(), "encoded paste text");
    Ok(strokes)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn caps_on() -> ModifierStatus {
        let mut raw = vec![0u8; 0x20];
        raw[0] = 0x04;
        ModifierStatus::from_bytes(raw)
    }

    #[test]
    fn test_hi_bang_produces_shifted_and_plain_strokes_in_order() {
        // Arrange
        let status = ModifierStatus::default();

        // Act
        let strokes = encode_text("Hi!", &status).unwrap();

        // Assert
        assert_eq!(
            strokes,
            vec![
                KeyStroke::down(HidKeyCode::ShiftLeft),
                KeyStroke::down(HidKeyCode::KeyH),
                KeyStroke::up(HidKeyCode::KeyH),
                KeyStroke::up(HidKeyCode::ShiftLeft),
                KeyStroke::down(HidKeyCode::KeyI),
                KeyStroke::up(HidKeyCode::KeyI),
                KeyStroke::down(HidKeyCode::ShiftLeft),
                KeyStroke::down(HidKeyCode::Digit1),
                KeyStroke::up(HidKeyCode::Digit1),
                KeyStroke::up(HidKeyCode::ShiftLeft),
            ]
        );
    }

    #[test]
    fn test_control_character_rejects_whole_text() {
        let result = encode_text("hi\x01there", &ModifierStatus::default());
        assert_eq!(
            result,
            Err(AsciiError::UnsupportedCharacter {
                ch: '\x01',
                index: 2
            })
        );
    }

    #[test]
    fn test_non_ascii_is_rejected() {
        let result = encode_text("café", &ModifierStatus::default());
        assert!(matches!(
            result,
            Err(AsciiError::UnsupportedCharacter { ch: 'é', index: 3 })
        ));
    }

    #[test]
    fn test_caps_lock_flips_letters_only() {
        // Arrange
        let status = caps_on();

        // Act
        let strokes = encode_text("aA1!", &status).unwrap();

        // Assert: 'a' needs Shift, 'A' does not, digits and symbols unchanged
        let keys: Vec<_> = strokes.iter().map(|s| (s.key, s.status)).collect();
        assert_eq!(keys.len(), 4 + 2 + 2 + 4);
        assert_eq!(strokes[0], KeyStroke::down(HidKeyCode::ShiftLeft));
        assert_eq!(strokes[1], KeyStroke::down(HidKeyCode::KeyA));
        assert_eq!(strokes[4], KeyStroke::down(HidKeyCode::KeyA));
        assert_eq!(strokes[6], KeyStroke::down(HidKeyCode::Digit1));
        assert_eq!(strokes[8], KeyStroke::down(HidKeyCode::ShiftLeft));
    }

    #[test]
    fn test_crlf_is_folded_to_single_enter() {
        let strokes = encode_text("a\r\nb", &ModifierStatus::default()).unwrap();
        let enters = strokes
            .iter()
            .filter(|s| s.key == HidKeyCode::Enter)
            .count();
        assert_eq!(enters, 2, "one Enter down and one Enter up");
        assert_eq!(strokes.len(), 6);
    }

    #[test]
    fn test_lone_cr_and_lf_both_type_enter() {
        let strokes = encode_text("\r\n\n\r", &ModifierStatus::default()).unwrap();
        assert_eq!(strokes.len(), 6);
        assert!(strokes.iter().all(|s| s.key == HidKeyCode::Enter));
    }

    #[test]
    fn test_whitespace_is_never_shifted_even_with_caps_lock() {
        let strokes = encode_text(" \t\n", &caps_on()).unwrap();
        assert_eq!(strokes.len(), 6);
        assert!(strokes.iter().all(|s| s.key != SHIFT_KEY));
        assert_eq!(strokes[0].key, HidKeyCode::Space);
        assert_eq!(strokes[2].key, HidKeyCode::Tab);
        assert_eq!(strokes[4].key, HidKeyCode::Enter);
    }

    #[test]
    fn test_every_printable_character_is_typeable() {
        for byte in 0x20u8..=0x7E {
            let ch = char::from(byte);
            assert!(chord_for(ch).is_some(), "{ch:?} has no chord");
        }
    }

    #[test]
    fn test_punctuation_shift_table() {
        let expect = [
            ('-', HidKeyCode::Minus, false),
            ('_', HidKeyCode::Minus, true),
            ('\\', HidKeyCode::Backslash, false),
            ('|', HidKeyCode::Backslash, true),
            ('`', HidKeyCode::Backquote, false),
            ('~', HidKeyCode::Backquote, true),
            ('0', HidKeyCode::Digit0, false),
            (')', HidKeyCode::Digit0, true),
            ('?', HidKeyCode::Slash, true),
        ];
        for (ch, key, shift) in expect {
            assert_eq!(chord_for(ch), Some(Chord { key, shift }), "{ch:?}");
        }
    }

    #[test]
    fn test_empty_text_produces_no_strokes() {
        assert_eq!(encode_text("", &ModifierStatus::default()), Ok(Vec::new()));
    }
}
