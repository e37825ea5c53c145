//! Protocol module containing the wire value types and the frame encoder.

pub mod frame;
pub mod messages;

pub use frame::{
    encode_absolute, encode_keyboard, encode_relative, encode_wheel, scale_absolute,
    wheel_from_scroll, AbsoluteMouseFrame, Frame, KeyboardFrame, RelativeMouseFrame,
};
pub use messages::*;
