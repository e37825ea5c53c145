//! Channel lifecycle, independent of any transport.
//!
//! Every channel cycles `Connecting → Open → Closed → Connecting …` forever.
//! There is no terminal state: a close of either kind is always followed by a
//! reconnect.  The transport driver in the console crate walks this machine
//! and publishes a [`ChannelSnapshot`]; senders only ask
//! [`ChannelSnapshot::check_send`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::messages::ChannelKind;

/// Lifecycle state of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    #[default]
    Connecting,
    Open,
    Closed,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelState::Connecting => "connecting",
            ChannelState::Open => "open",
            ChannelState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Errors reported by channel operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// A frame was offered while the channel was not open; it was dropped.
    #[error("{0} channel is not open")]
    NotOpen(ChannelKind),

    /// The driver attempted a transition the lifecycle does not allow.
    #[error("{kind} channel cannot go from {from} to {to}")]
    InvalidTransition {
        kind: ChannelKind,
        from: ChannelState,
        to: ChannelState,
    },
}

/// How a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer completed the closing handshake.
    Clean { code: u16, reason: String },
    /// The connection failed or vanished without a handshake.
    Died,
}

/// Operator-facing notice raised when a channel closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseNotice {
    pub channel: ChannelKind,
    pub reason: CloseReason,
}

impl CloseNotice {
    /// Non-clean closes must be acknowledged before the reconnect starts.
    pub fn is_blocking(&self) -> bool {
        matches!(self.reason, CloseReason::Died)
    }
}

impl fmt::Display for CloseNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            CloseReason::Clean { code, reason } => write!(
                f,
                "[{}] connection closed cleanly, code={code} reason={reason}",
                self.channel
            ),
            CloseReason::Died => write!(f, "[{}] connection died", self.channel),
        }
    }
}

/// Point-in-time view of a channel, as published to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub kind: ChannelKind,
    pub state: ChannelState,
    /// Number of times the channel has reached `Open`.
    pub open_count: u64,
}

impl ChannelSnapshot {
    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    /// Frames may only be sent while the channel is `Open`.
    pub fn check_send(&self) -> Result<(), ChannelError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(ChannelError::NotOpen(self.kind))
        }
    }
}

/// Lifecycle of a single channel.
#[derive(Debug, Clone)]
pub struct ChannelLifecycle {
    kind: ChannelKind,
    state: ChannelState,
    /// Number of times the channel has reached `Open`.
    opened: u64,
}

impl ChannelLifecycle {
    /// A new channel starts out `Connecting`.
    pub fn new(kind: ChannelKind) -> Self {
        Self {
            kind,
            state: ChannelState::Connecting,
            opened: 0,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn open_count(&self) -> u64 {
        self.opened
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            kind: self.kind,
            state: self.state,
            open_count: self.opened,
        }
    }

    /// `Connecting → Open`.
    pub fn opened(&mut self) -> Result<(), ChannelError> {
        self.transition(ChannelState::Connecting, ChannelState::Open)?;
        self.opened += 1;
        Ok(())
    }

    /// `Connecting | Open → Closed`.  A failed connect counts as a close.
    pub fn closed(&mut self, reason: CloseReason) -> Result<CloseNotice, ChannelError> {
        if self.state == ChannelState::Closed {
            return Err(self.invalid(ChannelState::Closed));
        }
        self.state = ChannelState::Closed;
        Ok(CloseNotice {
            channel: self.kind,
            reason,
        })
    }

    /// `Closed → Connecting`.
    pub fn reconnecting(&mut self) -> Result<(), ChannelError> {
        self.transition(ChannelState::Closed, ChannelState::Connecting)
    }

    fn transition(&mut self, from: ChannelState, to: ChannelState) -> Result<(), ChannelError> {
        if self.state != from {
            return Err(self.invalid(to));
        }
        self.state = to;
        Ok(())
    }

    fn invalid(&self, to: ChannelState) -> ChannelError {
        ChannelError::InvalidTransition {
            kind: self.kind,
            from: self.state,
            to,
        }
    }
}
