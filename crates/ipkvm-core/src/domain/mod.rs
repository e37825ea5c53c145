//! Domain logic for the operator input layer.
//!
//! This module contains pure state machines with no infrastructure
//! dependencies.  Every event carries its own timestamp, so each machine is
//! deterministic and can be tested without a clock.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core rules of the application.
//! - Has **no** imports from OS APIs, network libraries or async runtimes.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the rules are how raw mouse and touch events become clicks, drags and
//! double clicks, and how a channel moves between connecting, open and closed.

/// Channel lifecycle (`Connecting → Open → Closed → …`).
pub mod channel;
/// Mouse gesture disambiguation for absolute and relative modes.
pub mod gesture;
/// Video-element geometry and resolved pointer samples.
pub mod pointer;
/// One- and two-finger touch gestures on the relative channel.
pub mod touch;
