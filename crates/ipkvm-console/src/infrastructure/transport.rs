//! Transport seam between the channel manager and the wire.
//!
//! The channel manager only needs three things from a transport: open a
//! connection for a channel, write one binary frame, and wait for the next
//! inbound event.  Production uses WebSockets ([`super::ws_transport`]);
//! tests use [`super::mock::MockConnector`].

use async_trait::async_trait;
use ipkvm_core::{ChannelKind, CloseReason};
use thiserror::Error;

/// Error type for transport operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// A frame could not be written; the connection is unusable.
    #[error("write failed: {0}")]
    Write(String),
}

/// Something that arrived on a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A binary message from the remote side.
    Binary(Vec<u8>),
    /// The connection ended.  No further events follow.
    Closed(CloseReason),
}

/// Write half of one connection.
#[async_trait]
pub trait FrameWriter: Send {
    async fn write_frame(&mut self, bytes: Vec<u8>) -> Result<(), TransportError>;
}

/// Read half of one connection.
///
/// Implementations must be cancel-safe: the channel task polls this inside
/// `tokio::select!` and may drop the future to service an outbound frame.
#[async_trait]
pub trait EventReader: Send {
    /// Waits for the next binary message or the close.  Read errors are
    /// reported as [`CloseReason::Died`].
    async fn next_event(&mut self) -> TransportEvent;
}

/// Opens connections, one per call.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(
        &self,
        kind: ChannelKind,
    ) -> Result<(Box<dyn FrameWriter>, Box<dyn EventReader>), TransportError>;
}
