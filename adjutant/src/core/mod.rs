//! Deterministic, pure logic shared by the agent pipeline.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod policy;
pub mod reasoning;
pub mod types;
