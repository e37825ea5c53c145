//! Mock transport for unit and integration testing.
//!
//! Lets tests open channels without a server, script connect failures,
//! inject inbound messages and closes, and inspect every frame that reached
//! the "wire".

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ipkvm_core::{ChannelKind, CloseReason};
use tokio::sync::mpsc;

use super::transport::{Connector, EventReader, FrameWriter, TransportError, TransportEvent};

#[derive(Default)]
struct MockState {
    /// Frames written, per channel, across all connections.
    written: HashMap<ChannelKind, Vec<Vec<u8>>>,
    /// Successful connects per channel.
    connects: HashMap<ChannelKind, u32>,
    /// Connect attempts still to refuse, per channel.
    refuse: HashMap<ChannelKind, u32>,
    /// Inbound event injector for the live connection of each channel.
    live: HashMap<ChannelKind, mpsc::UnboundedSender<TransportEvent>>,
}

/// A [`Connector`] whose connections are in-memory queues.
///
/// Clones share state, so a test can keep one handle and give another to the
/// channel manager.
#[derive(Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `attempts` connects for `kind` fail.
    pub fn refuse_next(&self, kind: ChannelKind, attempts: u32) {
        self.lock().refuse.insert(kind, attempts);
    }

    /// Number of successful connects for `kind` so far.
    pub fn connect_count(&self, kind: ChannelKind) -> u32 {
        self.lock().connects.get(&kind).copied().unwrap_or(0)
    }

    /// Every frame written on `kind`, oldest first.
    pub fn written(&self, kind: ChannelKind) -> Vec<Vec<u8>> {
        self.lock().written.get(&kind).cloned().unwrap_or_default()
    }

    /// Delivers a binary message on the live connection of `kind`.
    ///
    /// Returns `false` if there is no live connection.
    pub fn push_inbound(&self, kind: ChannelKind, bytes: Vec<u8>) -> bool {
        self.inject(kind, TransportEvent::Binary(bytes))
    }

    /// Closes the live connection of `kind` from the remote side.
    ///
    /// Returns `false` if there is no live connection.
    pub fn close(&self, kind: ChannelKind, reason: CloseReason) -> bool {
        let injected = self.inject(kind, TransportEvent::Closed(reason));
        self.lock().live.remove(&kind);
        injected
    }

    fn inject(&self, kind: ChannelKind, event: TransportEvent) -> bool {
        self.lock()
            .live
            .get(&kind)
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("lock poisoned")
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(
        &self,
        kind: ChannelKind,
    ) -> Result<(Box<dyn FrameWriter>, Box<dyn EventReader>), TransportError> {
        let mut state = self.lock();
        if let Some(remaining) = state.refuse.get_mut(&kind) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(TransportError::Connect {
                    url: format!("mock:{}", kind.path()),
                    reason: "connection refused".to_string(),
                });
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        state.live.insert(kind, tx);
        *state.connects.entry(kind).or_insert(0) += 1;

        Ok((
            Box::new(MockWriter {
                kind,
                state: Arc::clone(&self.state),
            }),
            Box::new(MockReader { rx }),
        ))
    }
}

struct MockWriter {
    kind: ChannelKind,
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl FrameWriter for MockWriter {
    async fn write_frame(&mut self, bytes: Vec<u8>) -> Result<(), TransportError> {
        self.state
            .lock()
            .expect("lock poisoned")
            .written
            .entry(self.kind)
            .or_default()
            .push(bytes);
        Ok(())
    }
}

struct MockReader {
    rx: mpsc::UnboundedReceiver<TransportEvent>,
}

#[async_trait]
impl EventReader for MockReader {
    async fn next_event(&mut self) -> TransportEvent {
        match self.rx.recv().await {
            Some(event) => event,
            None => TransportEvent::Closed(CloseReason::Died),
        }
    }
}
