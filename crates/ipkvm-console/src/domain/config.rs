//! Console configuration types.
//!
//! [`ConsoleConfig`] is the single source of truth for all runtime settings.
//! It is built once at startup from defaults, an optional TOML file and CLI
//! arguments (see `infrastructure::config_file` and `main.rs`), then handed to
//! the channel manager and the dispatcher by value.

use std::time::Duration;

use ipkvm_core::protocol::messages::ChannelKind;
use ipkvm_core::{GestureConfig, MouseMode, VideoBounds};

/// Default base URL of the remote input endpoints.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:3000";

/// All runtime configuration for the console.
///
/// # Example
///
/// ```rust
/// use ipkvm_console::domain::ConsoleConfig;
///
/// let cfg = ConsoleConfig::default();
/// assert_eq!(cfg.gesture.resize_range, 500);
/// assert!(cfg.reconnect_delay.is_zero());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    /// Base URL of the remote side; channel paths are appended to it.
    pub server_url: String,

    /// Pause between a close and the next connect attempt.
    ///
    /// Zero means reconnect immediately.
    pub reconnect_delay: Duration,

    /// Mouse mode at startup.  The host feed can switch it later.
    pub mouse_mode: MouseMode,

    /// Resize range and double-click window for the gesture machines.
    pub gesture: GestureConfig,

    /// Video element size until the host reports a resize.
    pub video: VideoBounds,

    /// Fallback `tracing` filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for ConsoleConfig {
    /// | Field           | Default               |
    /// |-----------------|-----------------------|
    /// | server_url      | `ws://127.0.0.1:3000` |
    /// | reconnect_delay | 0                     |
    /// | mouse_mode      | absolute              |
    /// | resize_range    | 500                   |
    /// | double_click_ms | 300                   |
    /// | video           | 1280 × 720            |
    /// | log_level       | `info`                |
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            reconnect_delay: Duration::ZERO,
            mouse_mode: MouseMode::Absolute,
            gesture: GestureConfig::default(),
            video: VideoBounds::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Full WebSocket URL of one channel's endpoint.
    pub fn channel_url(&self, kind: ChannelKind) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), kind.path())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
