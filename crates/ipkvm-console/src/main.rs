//! ipkvm-console entry point.
//!
//! Reads host input events as JSON lines on stdin, translates them into HID
//! frames and sends them to the remote IP-KVM appliance over three
//! WebSocket channels that reconnect on their own.
//!
//! # Usage
//!
//! ```text
//! ipkvm-console [OPTIONS] < events.jsonl
//!
//! Options:
//!   --config <PATH>               TOML configuration file
//!   --server-url <URL>            Base WebSocket URL [default: ws://127.0.0.1:3000]
//!   --relative                    Start in relative mouse mode
//!   --resize-range <N>            Relative-mode coordinate range [default: 500]
//!   --double-click-ms <MS>        Double-click window [default: 300]
//!   --reconnect-delay-ms <MS>     Pause before reconnecting [default: 0]
//!   --log-level <FILTER>          Fallback log filter [default: info]
//! ```
//!
//! # Precedence
//!
//! Built-in defaults, then the TOML file, then environment variables, then
//! command-line flags.  `RUST_LOG` overrides the log level entirely.
//!
//! | Variable                   | Flag                   |
//! |----------------------------|------------------------|
//! | `IPKVM_CONFIG`             | `--config`             |
//! | `IPKVM_SERVER_URL`         | `--server-url`         |
//! | `IPKVM_RELATIVE`           | `--relative`           |
//! | `IPKVM_RESIZE_RANGE`       | `--resize-range`       |
//! | `IPKVM_DOUBLE_CLICK_MS`    | `--double-click-ms`    |
//! | `IPKVM_RECONNECT_DELAY_MS` | `--reconnect-delay-ms` |
//! | `IPKVM_LOG_LEVEL`          | `--log-level`          |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ipkvm_console::application::InputDispatcher;
use ipkvm_console::domain::ConsoleConfig;
use ipkvm_console::infrastructure::{
    load_config, run_host_feed, ChannelManager, LogNotifier, WsConnector,
};
use ipkvm_core::MouseMode;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// IP-KVM operator console.
///
/// Every option is optional; unset options keep the value from the
/// configuration file or the built-in default.
#[derive(Debug, Parser)]
#[command(
    name = "ipkvm-console",
    about = "Translate host input events into HID frames for an IP-KVM",
    version
)]
struct Cli {
    /// TOML configuration file.  A missing file means defaults.
    #[arg(long, env = "IPKVM_CONFIG")]
    config: Option<PathBuf>,

    /// Base WebSocket URL of the appliance, e.g. `ws://10.0.0.5:3000`.
    #[arg(long, env = "IPKVM_SERVER_URL")]
    server_url: Option<String>,

    /// Start in relative mouse mode.
    #[arg(long, env = "IPKVM_RELATIVE")]
    relative: bool,

    /// Coordinate range positions are scaled into in relative mode.
    #[arg(long, env = "IPKVM_RESIZE_RANGE")]
    resize_range: Option<u16>,

    /// Maximum gap between two presses that counts as a double-click.
    #[arg(long, env = "IPKVM_DOUBLE_CLICK_MS")]
    double_click_ms: Option<u64>,

    /// Pause between a close and the next connect attempt.
    #[arg(long, env = "IPKVM_RECONNECT_DELAY_MS")]
    reconnect_delay_ms: Option<u64>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, env = "IPKVM_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Layers the CLI arguments over the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read or parsed,
    /// or if an override is out of range.
    fn into_console_config(self) -> anyhow::Result<ConsoleConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ConsoleConfig::default(),
        };

        if let Some(url) = self.server_url {
            anyhow::ensure!(!url.trim().is_empty(), "--server-url must not be empty");
            config.server_url = url;
        }
        if self.relative {
            config.mouse_mode = MouseMode::Relative;
        }
        if let Some(range) = self.resize_range {
            anyhow::ensure!(range > 0, "--resize-range must be greater than zero");
            config.gesture.resize_range = range;
        }
        if let Some(ms) = self.double_click_ms {
            config.gesture.double_click_ms = ms;
        }
        if let Some(ms) = self.reconnect_delay_ms {
            config.reconnect_delay = Duration::from_millis(ms);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments and the optional config file become a [`ConsoleConfig`].
/// 2. `tracing_subscriber` is initialised; `RUST_LOG` wins over the
///    configured level.
/// 3. The [`ChannelManager`] starts connecting all three channels.
/// 4. Host events are read from stdin until end of input or Ctrl+C.
///
/// Everything runs on one thread: host events are handled strictly in order
/// and the channel tasks interleave with them at await points.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().into_console_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        "ipkvm-console starting: server={}, mode={:?}, resize_range={}",
        config.server_url, config.mouse_mode, config.gesture.resize_range
    );

    let manager = ChannelManager::start(
        Arc::new(WsConnector::new(config.server_url.clone())),
        Arc::new(LogNotifier),
        config.reconnect_delay,
    );
    let mut dispatcher = InputDispatcher::new(&config, manager);
    let stdin = BufReader::new(tokio::io::stdin());

    let interrupted = tokio::select! {
        result = run_host_feed(stdin, &mut dispatcher) => {
            let stats = result.context("failed to read host events from stdin")?;
            info!(
                events = stats.events,
                frames = stats.frames,
                malformed = stats.malformed,
                rejected = stats.rejected,
                "host input ended"
            );
            false
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl+C")?;
            info!("received Ctrl+C, shutting down");
            true
        }
    };

    // Dropping the dispatcher drops the manager, which stops the channel tasks.
    drop(dispatcher);
    info!("ipkvm-console stopped");

    if interrupted {
        // A pending stdin read would otherwise hold the runtime open.
        std::process::exit(0);
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
