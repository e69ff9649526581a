//! Policy-gated command execution.
//!
//! [`execute`] is the single entry point the pipeline uses to run a candidate
//! command: authorization first, then one bounded shell invocation, then a
//! deterministic merge of the captured streams into one displayable text.
//! Every path returns a [`CommandResult`]: denial, timeout and spawn faults
//! become text, never errors, so the pipeline always has output to present.

use tracing::{debug, instrument, warn};

use crate::core::policy::{self, ExecPolicy, Verdict};
use crate::core::types::{CommandResult, OutcomeKind};
use crate::io::process::{self, ShellOutcome};

/// Fixed text for a blank candidate command.
pub const NO_COMMAND_NOTICE: &str = "[INFO] No command to execute";
/// Fixed text for a command that ran silently.
pub const NO_OUTPUT_NOTICE: &str = "[INFO] Command executed with no output";
/// Fixed text for a command killed at the timeout.
pub const TIMEOUT_NOTICE: &str = "[ERROR] Command timed out";

/// Execute one candidate command under the snapshot policy.
///
/// Spawns at most one child process and never retries: re-running a possibly
/// mutating shell command is unsafe.
#[instrument(skip_all, fields(mode = %policy.mode))]
pub fn execute(command: &str, policy: &ExecPolicy) -> CommandResult {
    let command = command.trim();
    if command.is_empty() {
        // A blank plan is a no-op, not a denial; authorization is skipped.
        debug!("no command to execute");
        return CommandResult {
            text: NO_COMMAND_NOTICE.to_string(),
            kind: OutcomeKind::ExecutedNoOutput,
        };
    }

    match policy::authorize(command, policy.mode, &policy.allowed_commands) {
        Verdict::Permitted => {}
        Verdict::Denied => {
            debug!(command, "command denied by policy");
            return CommandResult {
                text: policy::denial_notice(policy.mode),
                kind: OutcomeKind::Denied,
            };
        }
        Verdict::Unparsable => {
            debug!(command, "command failed tokenization");
            return CommandResult {
                text: policy::denial_notice(policy.mode),
                kind: OutcomeKind::Invalid,
            };
        }
    }

    match process::run_shell(command, policy.timeout) {
        Ok(ShellOutcome::Completed { stdout, stderr }) => merge_streams(&stdout, &stderr),
        Ok(ShellOutcome::TimedOut) => CommandResult {
            text: TIMEOUT_NOTICE.to_string(),
            kind: OutcomeKind::TimedOut,
        },
        Err(err) => {
            warn!(err = %err, "command execution failed");
            CommandResult {
                text: format!("[ERROR] {:?}: {}", err.kind(), err),
                kind: OutcomeKind::ExecutionError,
            }
        }
    }
}

/// Deterministic merge of trimmed stdout/stderr into one text block.
fn merge_streams(stdout: &str, stderr: &str) -> CommandResult {
    let stdout = stdout.trim();
    let stderr = stderr.trim();
    let (text, kind) = match (stdout.is_empty(), stderr.is_empty()) {
        (false, false) => (
            format!("{stdout}\n\n[STDERR]\n{stderr}"),
            OutcomeKind::ExecutedWithOutput,
        ),
        (false, true) => (stdout.to_string(), OutcomeKind::ExecutedWithOutput),
        (true, false) => (
            format!("[STDERR]\n{stderr}"),
            OutcomeKind::ExecutedWithOutput,
        ),
        (true, true) => (NO_OUTPUT_NOTICE.to_string(), OutcomeKind::ExecutedNoOutput),
    };
    CommandResult { text, kind }
}
