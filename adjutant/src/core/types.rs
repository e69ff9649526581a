//! Shared result types for command execution and session runs.
//!
//! These types define stable contracts between the executor, the pipeline,
//! and callers. They carry no I/O state and stay deterministic across runs.

use serde::Serialize;

/// Classification attached to every command execution result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Command ran and produced stdout and/or stderr text.
    ExecutedWithOutput,
    /// Nothing to run, or the command ran silently.
    ExecutedNoOutput,
    /// Refused by the authorization policy.
    Denied,
    /// Killed after exceeding the wall-clock timeout.
    TimedOut,
    /// Command string could not be tokenized (unbalanced quoting).
    Invalid,
    /// The child process could not be spawned or waited on.
    ExecutionError,
}

/// Immutable result of one command execution attempt.
///
/// Every execution path ends in one of these; faults are folded into
/// displayable text rather than errors so the pipeline always has something
/// to present. The exit code is deliberately not carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// Display-ready text: the stdout/stderr merge or a fixed notice.
    pub text: String,
    pub kind: OutcomeKind,
}

/// Externally visible artifacts of one completed session run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    /// Candidate command produced by the Plan step (may be empty).
    pub command: String,
    /// Raw Execute output, captured before Present overwrites it.
    /// Absent when the safety state skipped execution.
    pub raw_output: Option<String>,
    /// Presented summary, or the safety notice when the step budget ran out.
    pub summary: String,
}
