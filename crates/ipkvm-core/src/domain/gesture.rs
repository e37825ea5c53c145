//! Mouse gesture state machine.
//!
//! # Two modes (for beginners)
//!
//! In **absolute** mode the remote machine is told exactly where the pointer
//! is, as a fraction of the screen.  Every host event becomes one absolute
//! frame and there is nothing to disambiguate.
//!
//! In **relative** (legacy) mode the remote side behaves like a laptop
//! touchpad: it only learns how far the pointer moved and which buttons are
//! down.  A plain press-and-drag moves the cursor *without* holding the left
//! button, so the console has to decide what a press means:
//!
//! - press then release at the same spot → a click (a "latch" frame with the
//!   left bit forced on);
//! - press, move, release → cursor motion only, no click;
//! - two presses at the same spot within the double-click window, the second
//!   one held → a drag with the left button down.
//!
//! ```text
//!            press                       release
//!   Idle ───────────────► Pressed ─────────────────► Idle
//!    ▲                      │  move: emit delta          │
//!    │                      └────────────────────────────┘
//!    └── set_mode() resets here
//! ```
//!
//! Only the first press of a gesture starts it, and only the release that
//! clears the left bit ends it.  Right or middle buttons going down or up in
//! between are passed through as button frames.

use serde::{Deserialize, Serialize};

use super::pointer::{PointerSample, VideoBounds, DEFAULT_RESIZE_RANGE};
use crate::protocol::frame::{AbsoluteMouseFrame, Frame, RelativeMouseFrame};
use crate::protocol::messages::{ButtonMask, DELTA_MAX};

/// Default double-click window in milliseconds.
pub const DEFAULT_DOUBLE_CLICK_MS: u64 = 300;

/// Which mouse channel the gesture machine feeds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseMode {
    #[default]
    Absolute,
    Relative,
}

impl MouseMode {
    pub fn from_relative_flag(relative: bool) -> Self {
        if relative {
            MouseMode::Relative
        } else {
            MouseMode::Absolute
        }
    }
}

/// Tunables shared by the mouse and touch machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Upper bound of resolved relative-mode coordinates.
    pub resize_range: u16,
    /// Maximum gap between presses that still counts as a double click.
    pub double_click_ms: u64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            resize_range: DEFAULT_RESIZE_RANGE,
            double_click_ms: DEFAULT_DOUBLE_CLICK_MS,
        }
    }
}

/// Gesture state of one pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    Pressed {
        start_pos: PointerSample,
        start_time_ms: u64,
    },
}

/// One raw pointer event as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    /// Buttons physically held after this event.
    pub buttons: ButtonMask,
    /// Pixel offset inside the video element.
    pub x: f64,
    pub y: f64,
    pub time_ms: u64,
}

/// Composes the outgoing button mask for a relative-mode event.
///
/// While the left button is not logically held, the physical left bit is
/// replaced by `held_left` and the right/middle bits pass through.  Once the
/// left button is logically held, raw button state passes through verbatim so
/// a right or middle click during a drag is never masked.
pub fn compose_buttons(current: ButtonMask, raw: ButtonMask, held_left: bool) -> ButtonMask {
    if current.left() {
        raw
    } else {
        let base = raw.intersect(ButtonMask::NON_LEFT);
        if held_left {
            base.with_left()
        } else {
            base
        }
    }
}

/// Translates raw mouse events into absolute or relative frames.
#[derive(Debug, Clone)]
pub struct MouseGesture {
    config: GestureConfig,
    bounds: VideoBounds,
    mode: MouseMode,
    state: GestureState,
    /// Buttons last sent on the relative channel.
    buttons: ButtonMask,
    held_left: bool,
    last: PointerSample,
    /// Position and time of the most recent press, kept across releases for
    /// the next double-click check.
    last_press: Option<(PointerSample, u64)>,
}

impl MouseGesture {
    pub fn new(config: GestureConfig, bounds: VideoBounds, mode: MouseMode) -> Self {
        Self {
            config,
            bounds,
            mode,
            state: GestureState::Idle,
            buttons: ButtonMask::NONE,
            held_left: false,
            last: PointerSample::default(),
            last_press: None,
        }
    }

    pub fn mode(&self) -> MouseMode {
        self.mode
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Buttons currently asserted on the relative channel.
    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    /// Switches mode.  Any relative-mode gesture in progress is abandoned.
    pub fn set_mode(&mut self, mode: MouseMode) {
        if mode != self.mode {
            tracing::debug!(?mode, "mouse mode changed");
        }
        self.mode = mode;
        self.reset();
    }

    pub fn set_bounds(&mut self, bounds: VideoBounds) {
        self.bounds = bounds;
    }

    /// Returns the relative machine to `Idle` with no buttons and no press history.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.buttons = ButtonMask::NONE;
        self.held_left = false;
        self.last_press = None;
    }

    // ── Events ───────────────────────────────────────────────────────────────

    pub fn press(&mut self, input: PointerInput) -> Vec<Frame> {
        match self.mode {
            MouseMode::Absolute => vec![self.absolute(input, 0)],
            MouseMode::Relative => self.relative_press(input),
        }
    }

    pub fn release(&mut self, input: PointerInput) -> Vec<Frame> {
        match self.mode {
            MouseMode::Absolute => vec![self.absolute(input, 0)],
            MouseMode::Relative => self.relative_release(input),
        }
    }

    pub fn motion(&mut self, input: PointerInput) -> Vec<Frame> {
        match self.mode {
            MouseMode::Absolute => vec![self.absolute(input, 0)],
            MouseMode::Relative => self.relative_motion(input),
        }
    }

    /// Emits a wheel frame.  `wheel` is in protocol steps; the encoder clamps it.
    pub fn wheel(&mut self, input: PointerInput, wheel: i32) -> Vec<Frame> {
        match self.mode {
            MouseMode::Absolute => vec![self.absolute(input, wheel)],
            MouseMode::Relative => vec![RelativeMouseFrame {
                buttons: self.buttons,
                dx: 0,
                dy: 0,
                wheel,
            }
            .into()],
        }
    }

    // ── Absolute mode ────────────────────────────────────────────────────────

    fn absolute(&self, input: PointerInput, wheel: i32) -> Frame {
        let (x, y) = self.bounds.to_absolute(input.x, input.y);
        AbsoluteMouseFrame {
            buttons: input.buttons,
            x,
            y,
            wheel,
        }
        .into()
    }

    // ── Relative mode ────────────────────────────────────────────────────────

    fn resolve(&self, input: &PointerInput) -> PointerSample {
        self.bounds
            .resolve(input.x, input.y, self.config.resize_range)
    }

    fn is_double_click(&self, pos: PointerSample, time_ms: u64) -> bool {
        match self.last_press {
            Some((prev_pos, prev_time)) => {
                prev_pos == pos
                    && time_ms >= prev_time
                    && time_ms - prev_time <= self.config.double_click_ms
            }
            None => false,
        }
    }

    fn relative_press(&mut self, input: PointerInput) -> Vec<Frame> {
        if matches!(self.state, GestureState::Pressed { .. }) {
            // Another button joined the press; the gesture keeps its origin.
            self.buttons = compose_buttons(self.buttons, input.buttons, self.held_left);
            return vec![RelativeMouseFrame::buttons_only(self.buttons).into()];
        }
        let pos = self.resolve(&input);
        self.held_left = self.is_double_click(pos, input.time_ms);
        self.last_press = Some((pos, input.time_ms));
        self.state = GestureState::Pressed {
            start_pos: pos,
            start_time_ms: input.time_ms,
        };
        self.last = pos;
        self.buttons = compose_buttons(self.buttons, input.buttons, self.held_left);
        tracing::trace!(?pos, held = self.held_left, "relative press");
        vec![RelativeMouseFrame::buttons_only(self.buttons).into()]
    }

    fn relative_motion(&mut self, input: PointerInput) -> Vec<Frame> {
        if !matches!(self.state, GestureState::Pressed { .. }) {
            return Vec::new();
        }
        let pos = self.resolve(&input);
        let (dx, dy) = pos.delta_from(self.last, DELTA_MAX);
        self.last = pos;
        self.buttons = compose_buttons(self.buttons, input.buttons, self.held_left);
        vec![RelativeMouseFrame {
            buttons: self.buttons,
            dx,
            dy,
            wheel: 0,
        }
        .into()]
    }

    fn relative_release(&mut self, input: PointerInput) -> Vec<Frame> {
        let pressed = matches!(self.state, GestureState::Pressed { .. });
        if pressed && input.buttons.left() {
            // A non-left button came up; the left press is still in progress.
            self.buttons = compose_buttons(self.buttons, input.buttons, self.held_left);
            return vec![RelativeMouseFrame::buttons_only(self.buttons).into()];
        }
        let pos = self.resolve(&input);
        let mut frames = Vec::with_capacity(2);
        if let GestureState::Pressed { start_pos, .. } = self.state {
            if pos == start_pos {
                frames.push(RelativeMouseFrame::buttons_only(self.buttons.with_left()).into());
            }
        }
        self.buttons = compose_buttons(self.buttons, input.buttons, false);
        self.held_left = false;
        self.state = GestureState::Idle;
        frames.push(RelativeMouseFrame::buttons_only(self.buttons).into());
        frames
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // 500x500 element so pixel offsets equal resolved coordinates.
    fn relative() -> MouseGesture {
        MouseGesture::new(
            GestureConfig::default(),
            VideoBounds::new(500.0, 500.0),
            MouseMode::Relative,
        )
    }

    fn input(buttons: u8, x: f64, y: f64, time_ms: u64) -> PointerInput {
        PointerInput {
            buttons: ButtonMask(buttons),
            x,
            y,
            time_ms,
        }
    }

    fn rel(buttons: u8, dx: i32, dy: i32) -> Frame {
        RelativeMouseFrame {
            buttons: ButtonMask(buttons),
            dx,
            dy,
            wheel: 0,
        }
        .into()
    }

    #[test]
    fn test_compose_buttons_masks_left_until_held() {
        let raw = ButtonMask(0b111);
        assert_eq!(compose_buttons(ButtonMask::NONE, raw, false), ButtonMask(0b110));
        assert_eq!(compose_buttons(ButtonMask::NONE, raw, true), ButtonMask(0b111));
        assert_eq!(
            compose_buttons(ButtonMask::LEFT, ButtonMask::RIGHT, false),
            ButtonMask::RIGHT,
            "raw passes through verbatim once left is held"
        );
    }

    #[test]
    fn test_absolute_mode_passes_raw_buttons_and_scaled_position() {
        // Arrange
        let mut gesture = MouseGesture::new(
            GestureConfig::default(),
            VideoBounds::new(1000.0, 1000.0),
            MouseMode::Absolute,
        );

        // Act
        let frames = gesture.press(input(1, 1000.0, 0.0, 0));

        // Assert
        assert_eq!(
            frames,
            vec![Frame::Absolute(AbsoluteMouseFrame {
                buttons: ButtonMask::LEFT,
                x: 0x7FFF,
                y: 0,
                wheel: 0
            })]
        );
        assert_eq!(gesture.state(), GestureState::Idle);
    }

    #[test]
    fn test_absolute_wheel_carries_steps() {
        let mut gesture = MouseGesture::new(
            GestureConfig::default(),
            VideoBounds::default(),
            MouseMode::Absolute,
        );
        let frames = gesture.wheel(input(0, 0.0, 0.0, 0), -2);
        assert!(matches!(frames[0], Frame::Absolute(AbsoluteMouseFrame { wheel: -2, .. })));
    }

    #[test]
    fn test_click_without_movement_emits_single_latch() {
        // Arrange
        let mut gesture = relative();

        // Act
        let down = gesture.press(input(1, 100.0, 100.0, 0));
        let up = gesture.release(input(0, 100.0, 100.0, 50));

        // Assert
        assert_eq!(down, vec![rel(0, 0, 0)]);
        assert_eq!(up, vec![rel(1, 0, 0), rel(0, 0, 0)]);
        assert_eq!(gesture.state(), GestureState::Idle);
    }

    #[test]
    fn test_drag_emits_deltas_and_no_latch() {
        // Arrange
        let mut gesture = relative();

        // Act
        gesture.press(input(1, 100.0, 100.0, 0));
        let moved = gesture.motion(input(1, 110.0, 95.0, 10));
        let moved_again = gesture.motion(input(1, 112.0, 95.0, 20));
        let up = gesture.release(input(0, 112.0, 95.0, 30));

        // Assert: deltas are from the last sample, left stays masked
        assert_eq!(moved, vec![rel(0, 10, -5)]);
        assert_eq!(moved_again, vec![rel(0, 2, 0)]);
        assert_eq!(up, vec![rel(0, 0, 0)]);
    }

    #[test]
    fn test_drag_back_to_press_position_latches() {
        let mut gesture = relative();
        gesture.press(input(1, 100.0, 100.0, 0));
        gesture.motion(input(1, 110.0, 100.0, 10));
        gesture.motion(input(1, 100.0, 100.0, 20));

        let up = gesture.release(input(0, 100.0, 100.0, 30));

        assert_eq!(up, vec![rel(1, 0, 0), rel(0, 0, 0)]);
    }

    #[test]
    fn test_move_while_idle_emits_nothing() {
        let mut gesture = relative();
        assert!(gesture.motion(input(0, 10.0, 10.0, 0)).is_empty());
    }

    #[test]
    fn test_large_jump_is_clamped_to_one_byte() {
        let gesture_bounds = VideoBounds::new(500.0, 500.0);
        let mut gesture = MouseGesture::new(
            GestureConfig::default(),
            gesture_bounds,
            MouseMode::Relative,
        );
        gesture.press(input(1, 0.0, 500.0, 0));
        let frames = gesture.motion(input(1, 500.0, 0.0, 5));
        assert_eq!(frames, vec![rel(0, 127, -127)]);
    }

    #[test]
    fn test_second_press_within_window_holds_left() {
        // Arrange
        let mut gesture = relative();
        gesture.press(input(1, 200.0, 200.0, 1_000));
        gesture.release(input(0, 200.0, 200.0, 1_080));

        // Act
        let down = gesture.press(input(1, 200.0, 200.0, 1_300));
        let drag = gesture.motion(input(1, 205.0, 200.0, 1_350));

        // Assert
        assert_eq!(down, vec![rel(1, 0, 0)]);
        assert_eq!(drag, vec![rel(1, 5, 0)]);
    }

    #[test]
    fn test_second_press_after_window_does_not_hold_left() {
        let mut gesture = relative();
        gesture.press(input(1, 200.0, 200.0, 1_000));
        gesture.release(input(0, 200.0, 200.0, 1_080));

        let down = gesture.press(input(1, 200.0, 200.0, 1_301));

        assert_eq!(down, vec![rel(0, 0, 0)]);
    }

    #[test]
    fn test_second_press_elsewhere_does_not_hold_left() {
        let mut gesture = relative();
        gesture.press(input(1, 200.0, 200.0, 1_000));
        gesture.release(input(0, 200.0, 200.0, 1_050));

        let down = gesture.press(input(1, 201.0, 200.0, 1_100));

        assert_eq!(down, vec![rel(0, 0, 0)]);
    }

    #[test]
    fn test_held_drag_release_clears_left() {
        // Arrange: double-click-and-hold, then drag away
        let mut gesture = relative();
        gesture.press(input(1, 50.0, 50.0, 0));
        gesture.release(input(0, 50.0, 50.0, 40));
        gesture.press(input(1, 50.0, 50.0, 120));
        gesture.motion(input(1, 80.0, 50.0, 160));

        // Act
        let up = gesture.release(input(0, 80.0, 50.0, 200));

        // Assert
        assert_eq!(up, vec![rel(0, 0, 0)]);
        assert_eq!(gesture.buttons(), ButtonMask::NONE);
    }

    #[test]
    fn test_right_button_passes_through_while_left_masked() {
        let mut gesture = relative();
        let down = gesture.press(input(0b011, 10.0, 10.0, 0));
        assert_eq!(down, vec![rel(0b010, 0, 0)]);
    }

    #[test]
    fn test_right_click_during_left_drag_keeps_gesture() {
        // Arrange
        let mut gesture = relative();
        gesture.press(input(0b001, 100.0, 100.0, 0));
        gesture.press(input(0b011, 100.0, 100.0, 400));

        // Act
        let right_up = gesture.release(input(0b001, 100.0, 100.0, 450));
        let moved = gesture.motion(input(0b001, 120.0, 100.0, 500));
        let left_up = gesture.release(input(0, 120.0, 100.0, 550));

        // Assert: no latch on the right-up, motion still flows
        assert_eq!(right_up, vec![rel(0, 0, 0)]);
        assert_eq!(moved, vec![rel(0, 20, 0)]);
        assert_eq!(left_up, vec![rel(0, 0, 0)]);
        assert_eq!(gesture.state(), GestureState::Idle);
    }

    #[test]
    fn test_right_click_during_held_drag_keeps_left_down() {
        // Arrange: double-click-and-hold
        let mut gesture = relative();
        gesture.press(input(0b001, 50.0, 50.0, 0));
        gesture.release(input(0, 50.0, 50.0, 40));
        gesture.press(input(0b001, 50.0, 50.0, 120));

        // Act
        let right_down = gesture.press(input(0b011, 50.0, 50.0, 150));
        let right_up = gesture.release(input(0b001, 50.0, 50.0, 180));
        let moved = gesture.motion(input(0b001, 60.0, 50.0, 200));

        // Assert
        assert_eq!(right_down, vec![rel(0b011, 0, 0)]);
        assert_eq!(right_up, vec![rel(0b001, 0, 0)]);
        assert_eq!(moved, vec![rel(0b001, 10, 0)]);
    }

    #[test]
    fn test_second_button_during_press_is_not_double_click() {
        // Arrange
        let mut gesture = relative();
        gesture.press(input(0b001, 100.0, 100.0, 0));

        // Act
        let second = gesture.press(input(0b011, 100.0, 100.0, 100));

        // Assert: left stays masked and the gesture keeps its origin
        assert_eq!(second, vec![rel(0b010, 0, 0)]);
        assert_eq!(
            gesture.state(),
            GestureState::Pressed {
                start_pos: PointerSample::new(100, 100),
                start_time_ms: 0
            }
        );
    }

    #[test]
    fn test_wheel_in_relative_mode_carries_current_buttons() {
        let mut gesture = relative();
        gesture.press(input(0b010, 10.0, 10.0, 0));
        let frames = gesture.wheel(input(0b010, 10.0, 10.0, 5), 3);
        assert_eq!(
            frames,
            vec![Frame::Relative(RelativeMouseFrame {
                buttons: ButtonMask::RIGHT,
                dx: 0,
                dy: 0,
                wheel: 3
            })]
        );
    }

    #[test]
    fn test_mode_switch_resets_gesture() {
        // Arrange
        let mut gesture = relative();
        gesture.press(input(1, 10.0, 10.0, 0));

        // Act
        gesture.set_mode(MouseMode::Absolute);
        gesture.set_mode(MouseMode::Relative);

        // Assert
        assert_eq!(gesture.state(), GestureState::Idle);
        assert!(gesture.motion(input(1, 20.0, 20.0, 5)).is_empty());
        let down = gesture.press(input(1, 10.0, 10.0, 10));
        assert_eq!(down, vec![rel(0, 0, 0)], "press history is cleared");
    }
}
