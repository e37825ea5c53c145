//! # ipkvm-core
//!
//! Input translation layer for an IP-KVM operator console: the key code
//! tables, the binary frame encoder, the paste encoder and the gesture state
//! machines.
//!
//! It has zero dependencies on OS APIs, async runtimes or network sockets.
//! Anything that talks to the remote side lives in `ipkvm-console`.
//!
//! # Architecture overview (for beginners)
//!
//! An IP-KVM lets an operator drive a remote machine's keyboard and mouse.
//! The remote side accepts three WebSocket channels (`/keyboard`, `/mouse`,
//! `/mouse_legacy`) and expects tiny fixed-size binary frames on each.
//!
//! - **`keymap`** – Which HID usage ID a key identifier or a pasted character
//!   corresponds to.  HID usage IDs are what a USB keyboard sends, so the
//!   remote side can replay them verbatim.
//!
//! - **`protocol`** – The frame layouts and the numeric clamping rules that
//!   keep every field inside its range.
//!
//! - **`domain`** – The stateful part: turning a stream of mouse or touch
//!   events into clicks, drags and double clicks, plus the channel lifecycle.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `ipkvm_core::MouseGesture` instead of `ipkvm_core::domain::gesture::MouseGesture`.
pub use domain::channel::{
    ChannelError, ChannelLifecycle, ChannelSnapshot, ChannelState, CloseNotice, CloseReason,
};
pub use domain::gesture::{
    compose_buttons, GestureConfig, GestureState, MouseGesture, MouseMode, PointerInput,
};
pub use domain::pointer::{PointerSample, VideoBounds};
pub use domain::touch::{TouchGesture, TouchPoint};
pub use keymap::ascii::{encode_text, AsciiError};
pub use keymap::hid::HidKeyCode;
pub use protocol::frame::Frame;
pub use protocol::messages::{ButtonMask, ChannelKind, KeyStatus, KeyStroke, ModifierStatus};
