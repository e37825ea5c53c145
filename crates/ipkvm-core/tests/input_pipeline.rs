//! Integration tests for the ipkvm-core input pipeline.
//!
//! These tests drive the public API the way the console does: host event in,
//! gesture or keymap step, frame encode, bytes out.

use ipkvm_core::{
    keymap::{dom, encode_text},
    protocol::frame::{encode_wheel, wheel_from_scroll},
    protocol::messages::ABS_MAX,
    AsciiError, ButtonMask, ChannelKind, Frame, GestureConfig, HidKeyCode, KeyStatus,
    ModifierStatus, MouseGesture, MouseMode, PointerInput, TouchGesture, TouchPoint, VideoBounds,
};

fn encode_all(frames: &[Frame]) -> Vec<(ChannelKind, Vec<u8>)> {
    frames.iter().map(|f| (f.channel(), f.encode())).collect()
}

fn pointer(buttons: u8, x: f64, y: f64, time_ms: u64) -> PointerInput {
    PointerInput {
        buttons: ButtonMask(buttons),
        x,
        y,
        time_ms,
    }
}

#[test]
fn test_key_identifier_to_keyboard_bytes() {
    // Arrange
    let hid = dom::lookup("KeyQ").expect("KeyQ is in the table");

    // Act
    let frame = Frame::Keyboard(ipkvm_core::protocol::frame::KeyboardFrame {
        key: hid,
        status: KeyStatus::Down,
    });

    // Assert
    assert_eq!(frame.channel(), ChannelKind::Keyboard);
    assert_eq!(frame.encode(), vec![0x00, 0x14, 0x01]);
}

#[test]
fn test_unknown_identifier_produces_no_code() {
    assert_eq!(dom::lookup("AudioVolumeUp"), None);
    assert_eq!(dom::lookup(""), None);
}

#[test]
fn test_paste_with_caps_lock_reported_by_remote() {
    // Arrange: the remote reports Caps Lock on in its LED bitmap
    let mut bitmap = vec![0u8; 0x20];
    bitmap[0] = 0x04;
    let status = ModifierStatus::from_bytes(bitmap);

    // Act
    let strokes = encode_text("Ab", &status).unwrap();

    // Assert: 'A' unshifted, 'b' shifted
    let keys: Vec<(HidKeyCode, KeyStatus)> = strokes.iter().map(|s| (s.key, s.status)).collect();
    assert_eq!(
        keys,
        vec![
            (HidKeyCode::KeyA, KeyStatus::Down),
            (HidKeyCode::KeyA, KeyStatus::Up),
            (HidKeyCode::ShiftLeft, KeyStatus::Down),
            (HidKeyCode::KeyB, KeyStatus::Down),
            (HidKeyCode::KeyB, KeyStatus::Up),
            (HidKeyCode::ShiftLeft, KeyStatus::Up),
        ]
    );
}

#[test]
fn test_rejected_paste_has_no_strokes() {
    let result = encode_text("hi\x01there", &ModifierStatus::default());
    assert!(matches!(
        result,
        Err(AsciiError::UnsupportedCharacter { ch: '\x01', .. })
    ));
}

#[test]
fn test_absolute_click_bytes() {
    // Arrange
    let mut gesture = MouseGesture::new(
        GestureConfig::default(),
        VideoBounds::new(1280.0, 720.0),
        MouseMode::Absolute,
    );

    // Act
    let mut frames = gesture.press(pointer(1, 1280.0, 720.0, 0));
    frames.extend(gesture.release(pointer(0, 0.0, 0.0, 10)));

    // Assert
    assert_eq!(
        encode_all(&frames),
        vec![
            (ChannelKind::Mouse, vec![0x01, 0xFF, 0x7F, 0xFF, 0x7F, 0x00]),
            (ChannelKind::Mouse, vec![0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
        ]
    );
}

#[test]
fn test_relative_double_click_and_hold_drag_bytes() {
    // Arrange
    let mut gesture = MouseGesture::new(
        GestureConfig::default(),
        VideoBounds::new(500.0, 500.0),
        MouseMode::Relative,
    );

    // Act: tap, then press again within 300 ms and drag left
    let mut frames = gesture.press(pointer(1, 250.0, 250.0, 0));
    frames.extend(gesture.release(pointer(0, 250.0, 250.0, 90)));
    frames.extend(gesture.press(pointer(1, 250.0, 250.0, 200)));
    frames.extend(gesture.motion(pointer(1, 240.0, 250.0, 220)));
    frames.extend(gesture.release(pointer(0, 240.0, 250.0, 260)));

    // Assert
    let bytes: Vec<Vec<u8>> = encode_all(&frames).into_iter().map(|(_, b)| b).collect();
    assert_eq!(
        bytes,
        vec![
            vec![0x00, 0x00, 0x00, 0x00], // first press, left masked
            vec![0x01, 0x00, 0x00, 0x00], // latch: click
            vec![0x00, 0x00, 0x00, 0x00], // release
            vec![0x01, 0x00, 0x00, 0x00], // second press holds left
            vec![0x01, 0xF6, 0x00, 0x00], // drag -10
            vec![0x00, 0x00, 0x00, 0x00], // release, no latch after a drag
        ]
    );
    assert!(frames.iter().all(|f| f.channel() == ChannelKind::MouseLegacy));
}

#[test]
fn test_touch_tap_bytes() {
    let mut touch = TouchGesture::new(GestureConfig::default(), VideoBounds::default());
    let point = TouchPoint { x: 10.0, y: 10.0 };

    let mut frames = touch.start(&[point], 0);
    frames.extend(touch.end(&[], 40));

    let bytes: Vec<Vec<u8>> = frames.iter().map(Frame::encode).collect();
    assert_eq!(bytes, vec![vec![0x01, 0, 0, 0], vec![0x00, 0, 0, 0]]);
}

#[test]
fn test_scroll_to_wheel_byte() {
    assert_eq!(encode_wheel(wheel_from_scroll(-160.0)), 0x02);
    assert_eq!(encode_wheel(wheel_from_scroll(1_000_000.0)), 0x81);
}

#[test]
fn test_absolute_scaling_covers_the_whole_range() {
    let bounds = VideoBounds::new(333.0, 333.0);
    for x in 0..=333 {
        let (sx, _) = bounds.to_absolute(f64::from(x), 0.0);
        assert!(sx <= ABS_MAX);
    }
    assert_eq!(bounds.to_absolute(333.0, 333.0), (ABS_MAX, ABS_MAX));
}

#[test]
fn test_channel_and_mode_names_serialize_as_snake_case() {
    assert_eq!(
        serde_json::to_string(&ChannelKind::MouseLegacy).unwrap(),
        "\"mouse_legacy\""
    );
    assert_eq!(
        serde_json::from_str::<MouseMode>("\"relative\"").unwrap(),
        MouseMode::Relative
    );
    assert_eq!(serde_json::to_string(&ButtonMask(5)).unwrap(), "5");
}
