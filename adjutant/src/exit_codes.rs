//! Stable exit codes for adjutant CLI commands.

/// Success. For `check`, the command is permitted.
pub const OK: i32 = 0;

/// Configuration, gateway, or run-level failure.
pub const FAILURE: i32 = 1;

/// `check` verdict: the command would be denied.
pub const DENIED: i32 = 2;
