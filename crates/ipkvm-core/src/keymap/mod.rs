//! Keyboard code tables.
//!
//! The canonical representation is the USB HID Usage ID (page 0x07).  Host
//! key identifiers ([`dom`]) and pasted text ([`ascii`]) are translated into it
//! before anything is framed.

pub mod ascii;
pub mod dom;
pub mod hid;

pub use ascii::{encode_text, AsciiError};
pub use hid::HidKeyCode;
