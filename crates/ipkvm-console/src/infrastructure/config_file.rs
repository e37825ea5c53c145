//! TOML configuration file for the console.
//!
//! Every field is optional; absent fields take the same defaults as
//! [`ConsoleConfig::default`].  A full file looks like:
//!
//! ```toml
//! log_level = "debug"
//!
//! [server]
//! url = "ws://10.0.0.5:3000"
//! reconnect_delay_ms = 0
//!
//! [mouse]
//! relative = false
//! resize_range = 500
//! double_click_ms = 300
//!
//! [video]
//! width = 1280
//! height = 720
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is missing, so an empty file is a valid
//! configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ipkvm_core::domain::gesture::DEFAULT_DOUBLE_CLICK_MS;
use ipkvm_core::domain::pointer::DEFAULT_RESIZE_RANGE;
use ipkvm_core::{GestureConfig, MouseMode, VideoBounds};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::config::{ConsoleConfig, DEFAULT_SERVER_URL};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but a value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ── File schema ───────────────────────────────────────────────────────────────

/// On-disk layout of the console configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigFile {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub mouse: MouseSection,
    #[serde(default)]
    pub video: VideoSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Base WebSocket URL; channel paths are appended.
    #[serde(default = "default_server_url")]
    pub url: String,
    /// Pause before reconnecting, in milliseconds.  `0` reconnects at once.
    #[serde(default)]
    pub reconnect_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MouseSection {
    /// Start in relative mode.
    #[serde(default)]
    pub relative: bool,
    #[serde(default = "default_resize_range")]
    pub resize_range: u16,
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoSection {
    #[serde(default = "default_video_width")]
    pub width: f64,
    #[serde(default = "default_video_height")]
    pub height: f64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}
fn default_resize_range() -> u16 {
    DEFAULT_RESIZE_RANGE
}
fn default_double_click_ms() -> u64 {
    DEFAULT_DOUBLE_CLICK_MS
}
fn default_video_width() -> f64 {
    VideoBounds::default().width
}
fn default_video_height() -> f64 {
    VideoBounds::default().height
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerSection::default(),
            mouse: MouseSection::default(),
            video: VideoSection::default(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            reconnect_delay_ms: 0,
        }
    }
}

impl Default for MouseSection {
    fn default() -> Self {
        Self {
            relative: false,
            resize_range: default_resize_range(),
            double_click_ms: default_double_click_ms(),
        }
    }
}

impl Default for VideoSection {
    fn default() -> Self {
        Self {
            width: default_video_width(),
            height: default_video_height(),
        }
    }
}

impl ConfigFile {
    /// Checks ranges and converts to the runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty URL, a zero resize range
    /// or a non-positive video size.
    pub fn into_console_config(self) -> Result<ConsoleConfig, ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Invalid("server.url must not be empty".into()));
        }
        if self.mouse.resize_range == 0 {
            return Err(ConfigError::Invalid(
                "mouse.resize_range must be greater than zero".into(),
            ));
        }
        if !(self.video.width > 0.0 && self.video.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "video size must be positive, got {}x{}",
                self.video.width, self.video.height
            )));
        }

        Ok(ConsoleConfig {
            server_url: self.server.url,
            reconnect_delay: Duration::from_millis(self.server.reconnect_delay_ms),
            mouse_mode: MouseMode::from_relative_flag(self.mouse.relative),
            gesture: GestureConfig {
                resize_range: self.mouse.resize_range,
                double_click_ms: self.mouse.double_click_ms,
            },
            video: VideoBounds::new(self.video.width, self.video.height),
            log_level: self.log_level,
        })
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses configuration text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for malformed TOML and
/// [`ConfigError::Invalid`] for out-of-range values.
pub fn parse_config(content: &str) -> Result<ConsoleConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(content)?;
    file.into_console_config()
}

/// Loads the configuration at `path`, returning defaults if the file does not
/// exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and the errors of [`parse_config`].
pub fn load_config(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConsoleConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
