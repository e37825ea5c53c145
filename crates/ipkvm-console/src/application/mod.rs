//! Application layer for ipkvm-console.
//!
//! The application layer knows *what* to do with a host event, and delegates
//! *how* frames reach the remote side to the infrastructure layer through the
//! [`FrameSender`] trait.
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or reconnecting (that is infrastructure)
//! - Tokio task spawning
//! - Reading stdin or config files

pub mod dispatcher;

pub use dispatcher::{FrameSender, InputDispatcher, InputError};
