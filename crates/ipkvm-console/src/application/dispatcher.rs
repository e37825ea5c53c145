//! Input dispatcher: host events in, frames out.
//!
//! [`InputDispatcher`] is the context object that owns every piece of input
//! state (the mouse gesture machine and the touch adapter) and the handle
//! used to send frames.  Handlers run one event at a time, to completion, in
//! the order the host delivered them.
//!
//! # Sending is fire-and-forget
//!
//! The dispatcher never waits on the network.  [`FrameSender::send`] either
//! queues the frame on an open channel or reports that the channel is not
//! open, in which case the frame is dropped.  Nothing is buffered for later.

use ipkvm_core::keymap::{dom, encode_text, AsciiError};
use ipkvm_core::protocol::frame::{wheel_from_scroll, KeyboardFrame};
use ipkvm_core::{
    ChannelError, ChannelKind, Frame, KeyStatus, ModifierStatus, MouseGesture, MouseMode,
    TouchGesture, VideoBounds,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::domain::{ConsoleConfig, HostEvent};

/// Error type for dispatching a host event.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    /// The host reported a key identifier with no HID usage.
    #[error("unmapped key identifier: {0:?}")]
    UnmappedKey(String),

    /// Paste text was rejected before anything was sent.
    #[error("paste rejected: {0}")]
    Paste(#[from] AsciiError),
}

/// Where encoded frames go.
///
/// The channel manager implements this over live WebSockets; tests use a
/// recording implementation.
pub trait FrameSender {
    /// Queues `bytes` on `channel` if it is open.  Never blocks.
    fn send(&self, channel: ChannelKind, bytes: Vec<u8>) -> Result<(), ChannelError>;

    /// Lock/LED state last reported by the remote keyboard.
    fn modifier_status(&self) -> ModifierStatus;
}

/// Routes host events through the gesture machines to a [`FrameSender`].
pub struct InputDispatcher<S> {
    sender: S,
    mouse: MouseGesture,
    touch: TouchGesture,
}

impl<S: FrameSender> InputDispatcher<S> {
    pub fn new(config: &ConsoleConfig, sender: S) -> Self {
        Self {
            sender,
            mouse: MouseGesture::new(config.gesture, config.video, config.mouse_mode),
            touch: TouchGesture::new(config.gesture, config.video),
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn mouse_mode(&self) -> MouseMode {
        self.mouse.mode()
    }

    /// Handles one host event.
    ///
    /// Returns the number of frames accepted by open channels.  Frames offered
    /// to a channel that is not open are dropped and not counted.
    ///
    /// # Errors
    ///
    /// - [`InputError::UnmappedKey`] if a key event names an unknown key.
    /// - [`InputError::Paste`] if paste text contains an untypeable character.
    ///
    /// Both are non-fatal; the event is simply discarded.
    pub fn handle(&mut self, event: HostEvent) -> Result<usize, InputError> {
        trace!(kind = event.kind(), "host event");
        let frames = match event {
            HostEvent::KeyDown { code } => vec![key_frame(&code, KeyStatus::Down)?],
            HostEvent::KeyUp { code } => vec![key_frame(&code, KeyStatus::Up)?],
            HostEvent::MouseDown(e) => self.mouse.press(e.into()),
            HostEvent::MouseUp(e) => self.mouse.release(e.into()),
            HostEvent::MouseMove(e) => self.mouse.motion(e.into()),
            HostEvent::Wheel { pointer, delta_y } => {
                self.mouse.wheel(pointer.into(), wheel_from_scroll(delta_y))
            }
            HostEvent::TouchStart(e) => self.touch.start(&e.touches, e.time_ms),
            HostEvent::TouchMove(e) => self.touch.motion(&e.touches),
            HostEvent::TouchEnd(e) => self.touch.end(&e.touches, e.time_ms),
            HostEvent::Paste { text } => return self.paste_text(&text),
            HostEvent::Resize { width, height } => {
                let bounds = VideoBounds::new(width, height);
                self.mouse.set_bounds(bounds);
                self.touch.set_bounds(bounds);
                debug!(width, height, "video bounds updated");
                Vec::new()
            }
            HostEvent::SetMode { relative } => {
                self.mouse.set_mode(MouseMode::from_relative_flag(relative));
                self.touch.reset();
                Vec::new()
            }
        };
        Ok(self.send_frames(frames))
    }

    /// Types `text` on the remote keyboard.
    ///
    /// The whole text is validated first; if any character is untypeable no
    /// key frame is sent.  Shift polarity follows the remote Caps Lock state
    /// at the moment of the call.
    pub fn paste_text(&mut self, text: &str) -> Result<usize, InputError> {
        let status = self.sender.modifier_status();
        let strokes = encode_text(text, &status).map_err(|e| {
            warn!("{e}");
            InputError::Paste(e)
        })?;
        debug!(strokes = strokes.len(), caps_lock = status.caps_lock(), "pasting text");
        let frames = strokes
            .into_iter()
            .map(|s| {
                Frame::Keyboard(KeyboardFrame {
                    key: s.key,
                    status: s.status,
                })
            })
            .collect();
        Ok(self.send_frames(frames))
    }

    fn send_frames(&self, frames: Vec<Frame>) -> usize {
        let mut sent = 0;
        for frame in frames {
            match self.sender.send(frame.channel(), frame.encode()) {
                Ok(()) => sent += 1,
                Err(e) => trace!("frame dropped: {e}"),
            }
        }
        sent
    }
}

fn key_frame(code: &str, status: KeyStatus) -> Result<Frame, InputError> {
    let key = dom::lookup(code).ok_or_else(|| InputError::UnmappedKey(code.to_string()))?;
    trace!(code, key = key.dom_code(), usage = key.as_u8(), ?status, "key frame");
    Ok(Frame::Keyboard(KeyboardFrame { key, status }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
