//! Host event feed: newline-delimited JSON in, dispatcher calls out.
//!
//! The host (a browser shim, a test harness, or a person at a terminal)
//! writes one [`HostEvent`] per line.  Blank lines are ignored.  A line that
//! does not parse is logged and skipped; it never stops the feed.
//!
//! ```text
//! {"type":"key_down","code":"KeyA"}
//! {"type":"key_up","code":"KeyA"}
//! {"type":"paste","text":"ls -la\n"}
//! ```

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::application::{FrameSender, InputDispatcher, InputError};
use crate::domain::HostEvent;

/// Counters for one run of the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    /// Events that parsed and were handled without error.
    pub events: u64,
    /// Frames accepted by open channels.
    pub frames: u64,
    /// Lines that were not a valid host event.
    pub malformed: u64,
    /// Events the dispatcher rejected (unmapped key, untypeable paste).
    pub rejected: u64,
}

/// Reads host events from `reader` until end of input.
///
/// # Errors
///
/// Returns an I/O error only if reading from `reader` fails.  Bad input
/// lines are counted in [`FeedStats`] instead.
pub async fn run_host_feed<R, S>(
    reader: R,
    dispatcher: &mut InputDispatcher<S>,
) -> std::io::Result<FeedStats>
where
    R: AsyncBufRead + Unpin,
    S: FrameSender,
{
    let mut stats = FeedStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event: HostEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                warn!("skipping malformed host event: {e}");
                stats.malformed += 1;
                continue;
            }
        };

        match dispatcher.handle(event) {
            Ok(sent) => {
                stats.events += 1;
                stats.frames += sent as u64;
            }
            Err(InputError::UnmappedKey(code)) => {
                debug!("ignoring unmapped key {code:?}");
                stats.rejected += 1;
            }
            // The dispatcher already logged the rejected paste.
            Err(InputError::Paste(_)) => stats.rejected += 1,
        }
    }

    debug!(?stats, "host feed ended");
    Ok(stats)
}
