//! Turns one natural-language task into one vetted shell command.
//!
//! Each task flows through a fixed three-step pipeline: a planner proposes a
//! command, a policy-gated executor runs it under a timeout, and a presenter
//! summarizes the output. The crate is split along a strict I/O boundary:
//!
//! - [`core`] holds pure, deterministic logic: the authorization policy,
//!   reasoning extraction, and the shared result types. Nothing in it spawns
//!   processes or touches the network.
//! - [`io`] holds everything that does: shell execution, inference gateways,
//!   prompt rendering, and configuration loading.
//! - [`agents`], [`pipeline`], and [`session`] orchestrate the two halves
//!   into runs.

pub mod agents;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod session;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
