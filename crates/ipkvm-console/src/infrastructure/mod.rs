//! Infrastructure layer for ipkvm-console.
//!
//! Everything that touches the outside world lives here.
//!
//! # Responsibilities
//!
//! - Opening the three channel WebSockets and reconnecting them
//! - Publishing channel state and the remote modifier status
//! - Reading host events from a line-oriented JSON stream
//! - Loading the TOML configuration file
//!
//! # What does NOT belong here?
//!
//! - Gesture and keymap logic (that is `ipkvm-core`)
//! - Choosing which frames an event produces (that is the application layer)

pub mod channel_manager;
pub mod config_file;
pub mod host_feed;
pub mod mock;
pub mod transport;
pub mod ws_transport;

pub use channel_manager::{ChannelManager, LogNotifier, Notifier};
pub use config_file::{load_config, ConfigError};
pub use host_feed::{run_host_feed, FeedStats};
pub use transport::{Connector, EventReader, FrameWriter, TransportError, TransportEvent};
pub use ws_transport::WsConnector;
