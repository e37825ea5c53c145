//! WebSocket transport (tokio-tungstenite).
//!
//! Each channel is its own WebSocket at `<server_url><path>`.  Frames travel
//! as binary messages.  Text, ping and pong messages are ignored; tungstenite
//! answers pings on its own.
//!
//! # Close semantics
//!
//! A close frame from the server is a *clean* close and carries its code and
//! reason (a close frame with no payload reports code 1005, as browsers do).
//! A stream that ends or errors without a close frame is a *non-clean* close.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use ipkvm_core::{ChannelKind, CloseReason};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use super::transport::{Connector, EventReader, FrameWriter, TransportError, TransportEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Close code reported when the peer's close frame has no status.
const CLOSE_NO_STATUS: u16 = 1005;

/// Opens one WebSocket per channel under a common base URL.
#[derive(Debug, Clone)]
pub struct WsConnector {
    base_url: String,
}

impl WsConnector {
    /// `base_url` is e.g. `ws://10.0.0.5:3000`; channel paths are appended.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, kind: ChannelKind) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), kind.path())
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(
        &self,
        kind: ChannelKind,
    ) -> Result<(Box<dyn FrameWriter>, Box<dyn EventReader>), TransportError> {
        let url = self.url_for(kind);
        let (stream, _response) =
            connect_async(url.as_str())
                .await
                .map_err(|e| TransportError::Connect {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;
        debug!("{kind}: WebSocket handshake complete with {url}");

        let (sink, stream) = stream.split();
        Ok((
            Box::new(WsFrameWriter { sink }),
            Box::new(WsEventReader { stream }),
        ))
    }
}

struct WsFrameWriter {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameWriter for WsFrameWriter {
    async fn write_frame(&mut self, bytes: Vec<u8>) -> Result<(), TransportError> {
        self.sink
            .send(Message::Binary(bytes))
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }
}

struct WsEventReader {
    stream: SplitStream<WsStream>,
}

#[async_trait]
impl EventReader for WsEventReader {
    async fn next_event(&mut self) -> TransportEvent {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Binary(bytes))) => return TransportEvent::Binary(bytes),
                Some(Ok(Message::Close(frame))) => {
                    let reason = match frame {
                        Some(frame) => CloseReason::Clean {
                            code: u16::from(frame.code),
                            reason: frame.reason.into_owned(),
                        },
                        None => CloseReason::Clean {
                            code: CLOSE_NO_STATUS,
                            reason: String::new(),
                        },
                    };
                    return TransportEvent::Closed(reason);
                }
                // Text, ping, pong and raw frames carry no input state.
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!("WebSocket read error: {e}");
                    return TransportEvent::Closed(CloseReason::Died);
                }
                None => return TransportEvent::Closed(CloseReason::Died),
            }
        }
    }
}
