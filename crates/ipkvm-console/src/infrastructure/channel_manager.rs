//! Channel lifecycle manager.
//!
//! Owns one auto-reconnecting connection per channel (`keyboard`, `mouse`,
//! `mouse_legacy`) and exposes a single "send or drop" operation to the
//! dispatcher.
//!
//! # Task layout
//!
//! ```text
//!   dispatcher ── send() ──► mpsc (unbounded) ──► channel task ──► FrameWriter
//!        ▲                                           │
//!        └──── watch<ChannelSnapshot> ◄──────────────┤
//!        └──── watch<ModifierStatus>  ◄── keyboard ──┘◄── EventReader
//! ```
//!
//! Each channel task loops forever: connect, publish `Open`, pump frames and
//! inbound events until the connection closes, publish `Closed`, raise a
//! notice, reconnect.  A failed connect is treated like a non-clean close.
//!
//! `send` checks the published state before queueing, so nothing is queued
//! while a channel is `Connecting` or `Closed`.  Frames still queued when a
//! connection drops are discarded before the next `Open`; input is never
//! replayed on a new connection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ipkvm_core::{
    ChannelError, ChannelKind, ChannelLifecycle, ChannelSnapshot, CloseNotice, CloseReason,
    ModifierStatus,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use super::transport::{Connector, EventReader, FrameWriter, TransportEvent};
use crate::application::FrameSender;

// ── Close notices ─────────────────────────────────────────────────────────────

/// Receives the operator-facing notice raised on every close.
///
/// For a non-clean close the channel task awaits [`Notifier::notify`] before
/// reconnecting, so an implementation that waits for acknowledgement holds
/// the reconnect.  Clean-close notices are delivered on a separate task and
/// never delay the reconnect.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &CloseNotice);
}

/// Writes notices to the log and returns immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &CloseNotice) {
        if notice.is_blocking() {
            warn!("{notice}");
        } else {
            info!("{notice}");
        }
    }
}

// ── Manager ───────────────────────────────────────────────────────────────────

struct ChannelHandle {
    outbound: mpsc::UnboundedSender<Vec<u8>>,
    snapshot: watch::Receiver<ChannelSnapshot>,
    task: JoinHandle<()>,
}

/// Owns the three channel tasks.  Dropping the manager stops them.
pub struct ChannelManager {
    channels: [ChannelHandle; 3],
    modifiers: watch::Receiver<ModifierStatus>,
}

fn slot(kind: ChannelKind) -> usize {
    match kind {
        ChannelKind::Keyboard => 0,
        ChannelKind::Mouse => 1,
        ChannelKind::MouseLegacy => 2,
    }
}

impl ChannelManager {
    /// Spawns one task per channel and starts connecting immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        connector: Arc<dyn Connector>,
        notifier: Arc<dyn Notifier>,
        reconnect_delay: Duration,
    ) -> Self {
        let (modifier_tx, modifiers) = watch::channel(ModifierStatus::default());
        let mut modifier_tx = Some(modifier_tx);

        let channels = ChannelKind::ALL.map(|kind| {
            let lifecycle = ChannelLifecycle::new(kind);
            let (outbound, outbound_rx) = mpsc::unbounded_channel();
            let (snapshot_tx, snapshot) = watch::channel(lifecycle.snapshot());
            let task = ChannelTask {
                lifecycle,
                connector: Arc::clone(&connector),
                notifier: Arc::clone(&notifier),
                outbound: outbound_rx,
                snapshot: snapshot_tx,
                // Only the keyboard channel carries modifier status.
                modifiers: if kind == ChannelKind::Keyboard {
                    modifier_tx.take()
                } else {
                    None
                },
                reconnect_delay,
            };
            ChannelHandle {
                outbound,
                snapshot,
                task: tokio::spawn(task.run()),
            }
        });

        Self {
            channels,
            modifiers,
        }
    }

    /// Queues `bytes` on `kind` if the channel is open.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::NotOpen`] while the channel is connecting or
    /// closed.  The frame is dropped.
    pub fn send(&self, kind: ChannelKind, bytes: Vec<u8>) -> Result<(), ChannelError> {
        let handle = &self.channels[slot(kind)];
        handle.snapshot.borrow().check_send()?;
        handle
            .outbound
            .send(bytes)
            .map_err(|_| ChannelError::NotOpen(kind))
    }

    /// Current state of one channel.
    pub fn snapshot(&self, kind: ChannelKind) -> ChannelSnapshot {
        *self.channels[slot(kind)].snapshot.borrow()
    }

    /// Watches one channel's state.
    pub fn subscribe(&self, kind: ChannelKind) -> watch::Receiver<ChannelSnapshot> {
        self.channels[slot(kind)].snapshot.clone()
    }

    /// Lock/LED state last reported on the keyboard channel.
    pub fn modifier_status(&self) -> ModifierStatus {
        self.modifiers.borrow().clone()
    }

    /// Watches the modifier status.
    pub fn subscribe_modifiers(&self) -> watch::Receiver<ModifierStatus> {
        self.modifiers.clone()
    }
}

impl Drop for ChannelManager {
    fn drop(&mut self) {
        for handle in &self.channels {
            handle.task.abort();
        }
    }
}

impl FrameSender for ChannelManager {
    fn send(&self, channel: ChannelKind, bytes: Vec<u8>) -> Result<(), ChannelError> {
        ChannelManager::send(self, channel, bytes)
    }

    fn modifier_status(&self) -> ModifierStatus {
        ChannelManager::modifier_status(self)
    }
}

// ── Channel task ──────────────────────────────────────────────────────────────

struct ChannelTask {
    lifecycle: ChannelLifecycle,
    connector: Arc<dyn Connector>,
    notifier: Arc<dyn Notifier>,
    outbound: mpsc::UnboundedReceiver<Vec<u8>>,
    snapshot: watch::Sender<ChannelSnapshot>,
    modifiers: Option<watch::Sender<ModifierStatus>>,
    reconnect_delay: Duration,
}

impl ChannelTask {
    async fn run(mut self) {
        let kind = self.lifecycle.kind();
        loop {
            debug!("{kind}: connecting");
            let reason = match self.connector.connect(kind).await {
                Ok((writer, reader)) => {
                    let stale = self.drain_stale();
                    if stale > 0 {
                        debug!("{kind}: discarded {stale} stale frame(s)");
                    }
                    if let Err(e) = self.lifecycle.opened() {
                        error!("{e}");
                    }
                    self.publish();
                    info!("{kind}: channel open");

                    match self.pump(writer, reader).await {
                        Some(reason) => reason,
                        None => {
                            debug!("{kind}: manager dropped; channel task exiting");
                            return;
                        }
                    }
                }
                Err(e) => {
                    error!("{kind}: {e}");
                    CloseReason::Died
                }
            };

            match self.lifecycle.closed(reason) {
                Ok(notice) => {
                    self.publish();
                    self.raise(notice).await;
                }
                Err(e) => error!("{e}"),
            }

            self.pause().await;
            if let Err(e) = self.lifecycle.reconnecting() {
                error!("{e}");
            }
            self.publish();
        }
    }

    /// Moves frames out and events in until the connection closes.
    ///
    /// Returns `None` when the manager has gone away.
    async fn pump(
        &mut self,
        mut writer: Box<dyn FrameWriter>,
        mut reader: Box<dyn EventReader>,
    ) -> Option<CloseReason> {
        let kind = self.lifecycle.kind();
        loop {
            tokio::select! {
                frame = self.outbound.recv() => {
                    let bytes = frame?;
                    if let Err(e) = writer.write_frame(bytes).await {
                        error!("{kind}: {e}");
                        return Some(CloseReason::Died);
                    }
                }
                event = reader.next_event() => match event {
                    TransportEvent::Binary(bytes) => match &self.modifiers {
                        Some(modifiers) => {
                            trace!("{kind}: modifier status {bytes:02x?}");
                            modifiers.send_replace(ModifierStatus::from_bytes(bytes));
                        }
                        None => trace!("{kind}: ignoring {} inbound byte(s)", bytes.len()),
                    },
                    TransportEvent::Closed(reason) => return Some(reason),
                },
            }
        }
    }

    fn drain_stale(&mut self) -> usize {
        let mut stale = 0;
        while self.outbound.try_recv().is_ok() {
            stale += 1;
        }
        stale
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.lifecycle.snapshot());
    }

    async fn raise(&self, notice: CloseNotice) {
        if notice.is_blocking() {
            self.notifier.notify(&notice).await;
        } else {
            let notifier = Arc::clone(&self.notifier);
            tokio::spawn(async move { notifier.notify(&notice).await });
        }
    }

    async fn pause(&self) {
        if self.reconnect_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockConnector;
    use ipkvm_core::ChannelState;

    async fn wait_open(manager: &ChannelManager, kind: ChannelKind, open_count: u64) {
        let mut rx = manager.subscribe(kind);
        tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.is_open() && s.open_count >= open_count),
        )
        .await
        .expect("channel did not open in time")
        .expect("channel task ended");
    }

    #[tokio::test]
    async fn test_all_channels_open_on_start() {
        // Arrange
        let mock = MockConnector::new();

        // Act
        let manager = ChannelManager::start(
            Arc::new(mock.clone()),
            Arc::new(LogNotifier),
            Duration::ZERO,
        );
        for kind in ChannelKind::ALL {
            wait_open(&manager, kind, 1).await;
        }

        // Assert
        for kind in ChannelKind::ALL {
            assert_eq!(mock.connect_count(kind), 1);
            assert_eq!(manager.snapshot(kind).state, ChannelState::Open);
        }
    }

    #[tokio::test]
    async fn test_send_reaches_writer_when_open() {
        let mock = MockConnector::new();
        let manager =
            ChannelManager::start(Arc::new(mock.clone()), Arc::new(LogNotifier), Duration::ZERO);
        wait_open(&manager, ChannelKind::Mouse, 1).await;

        manager
            .send(ChannelKind::Mouse, vec![1, 2, 3, 4, 5, 6])
            .unwrap();
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;

        assert_eq!(mock.written(ChannelKind::Mouse), vec![vec![1, 2, 3, 4, 5, 6]]);
    }

    #[tokio::test]
    async fn test_keyboard_inbound_replaces_modifier_status() {
        // Arrange
        let mock = MockConnector::new();
        let manager =
            ChannelManager::start(Arc::new(mock.clone()), Arc::new(LogNotifier), Duration::ZERO);
        wait_open(&manager, ChannelKind::Keyboard, 1).await;
        let mut modifiers = manager.subscribe_modifiers();

        // Act
        assert!(mock.push_inbound(ChannelKind::Keyboard, vec![0x04, 0x00]));
        modifiers.changed().await.unwrap();

        // Assert
        assert!(manager.modifier_status().caps_lock());
        assert_eq!(manager.modifier_status().as_bytes(), &[0x04, 0x00]);
    }

    #[tokio::test]
    async fn test_mouse_inbound_does_not_touch_modifier_status() {
        let mock = MockConnector::new();
        let manager =
            ChannelManager::start(Arc::new(mock.clone()), Arc::new(LogNotifier), Duration::ZERO);
        wait_open(&manager, ChannelKind::Mouse, 1).await;

        mock.push_inbound(ChannelKind::Mouse, vec![0xFF]);
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        assert_eq!(manager.modifier_status(), ModifierStatus::default());
    }

    fn mouse_task(
        mock: &MockConnector,
        outbound: mpsc::UnboundedReceiver<Vec<u8>>,
    ) -> (ChannelTask, watch::Receiver<ChannelSnapshot>) {
        let lifecycle = ChannelLifecycle::new(ChannelKind::Mouse);
        let (snapshot, snapshot_rx) = watch::channel(lifecycle.snapshot());
        let task = ChannelTask {
            lifecycle,
            connector: Arc::new(mock.clone()),
            notifier: Arc::new(LogNotifier),
            outbound,
            snapshot,
            modifiers: None,
            reconnect_delay: Duration::ZERO,
        };
        (task, snapshot_rx)
    }

    #[tokio::test]
    async fn test_frames_queued_before_open_are_discarded() {
        // Arrange: two frames are already waiting when the task starts
        let mock = MockConnector::new();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(vec![1; 6]).unwrap();
        tx.send(vec![2; 6]).unwrap();
        let (task, mut snapshot) = mouse_task(&mock, rx);

        // Act
        let handle = tokio::spawn(task.run());
        snapshot.wait_for(|s| s.is_open()).await.unwrap();
        tx.send(vec![3; 6]).unwrap();
        tokio::time::timeout(Duration::from_secs(5), async {
            while mock.written(ChannelKind::Mouse).is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("frame was not written");
        handle.abort();

        // Assert
        assert_eq!(mock.written(ChannelKind::Mouse), vec![vec![3; 6]]);
    }

    #[tokio::test]
    async fn test_task_exits_when_outbound_sender_is_dropped() {
        let mock = MockConnector::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let (task, mut snapshot) = mouse_task(&mock, rx);

        let handle = tokio::spawn(task.run());
        snapshot.wait_for(|s| s.is_open()).await.unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("task did not exit")
            .expect("task panicked");
        assert_eq!(mock.connect_count(ChannelKind::Mouse), 1);
    }

    #[tokio::test]
    async fn test_log_notifier_returns_for_both_kinds() {
        let notifier = LogNotifier;
        notifier
            .notify(&CloseNotice {
                channel: ChannelKind::Keyboard,
                reason: CloseReason::Died,
            })
            .await;
        notifier
            .notify(&CloseNotice {
                channel: ChannelKind::Keyboard,
                reason: CloseReason::Clean {
                    code: 1000,
                    reason: String::new(),
                },
            })
            .await;
    }
}
