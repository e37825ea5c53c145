//! ipkvm-console library crate.
//!
//! The operator side of an IP-KVM: turns host keyboard, mouse, touch and
//! paste events into HID frames and keeps the three input channels to the
//! remote appliance connected.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Host events (JSON lines on stdin)
//!         ↓
//! [ipkvm-console]
//!   ├── domain/           ConsoleConfig, HostEvent
//!   ├── application/      InputDispatcher: events → gesture machines → frames
//!   └── infrastructure/
//!         ├── host_feed/        JSON line reader
//!         ├── channel_manager/  per-channel reconnect tasks
//!         ├── ws_transport/     WebSockets (tokio-tungstenite)
//!         └── config_file/      TOML configuration
//!         ↓
//! Remote appliance: /keyboard, /mouse, /mouse_legacy
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `ipkvm-core` only; it reaches the
//!   network through the `FrameSender` trait.
//! - `infrastructure` depends on all other layers plus `tokio` and
//!   `tokio-tungstenite`.

/// Domain layer: configuration and host event types (no I/O).
pub mod domain;

/// Application layer: input dispatch.
pub mod application;

/// Infrastructure layer: channels, transport, host feed, config file.
pub mod infrastructure;
