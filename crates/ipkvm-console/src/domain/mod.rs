//! Domain layer for ipkvm-console.
//!
//! The domain layer contains plain data types with no dependencies on I/O,
//! networking or the async runtime.
//!
//! # What belongs in the domain layer?
//!
//! - The host event types (the JSON "language" of the event feed)
//! - Configuration structures
//!
//! # What does NOT belong here?
//!
//! - Any `tokio` or WebSocket types
//! - File I/O or environment variable reading

pub mod config;
pub mod events;

pub use config::ConsoleConfig;
pub use events::{HostEvent, PointerEvent, TouchEvent};
