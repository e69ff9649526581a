//! Mode-based command authorization.
//!
//! Decides whether a candidate shell command may run before anything is
//! spawned. Stable mode permits only commands whose first token is on an
//! allowlist (a custom list from configuration, or the built-in read-only
//! set). Experimental mode permits everything except known-interactive
//! commands that would wedge a non-interactive session. Authorization is a
//! pure function of the command string, the mode, and the fixed sets; a
//! string that cannot be tokenized is denied in every mode.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Execution posture controlling command authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Allowlist-only: unknown commands are refused.
    Stable,
    /// Denylist-only: anything goes except interactive commands.
    Experimental,
}

impl ExecutionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Stable => "stable",
            ExecutionMode::Experimental => "experimental",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known read-only system-inspection commands permitted in stable mode when
/// no custom allowlist is configured.
pub const DEFAULT_ALLOWLIST: &[&str] = &[
    // system info
    "fastfetch",
    "neofetch",
    "uname",
    "uptime",
    "lsb_release",
    "hostname",
    // memory / cpu
    "free",
    "vmstat",
    "mpstat",
    "lscpu",
    "lsmem",
    // disk
    "df",
    "lsblk",
    "mount",
    "findmnt",
    // processes (read-only)
    "ps",
    // networking (read-only)
    "ip",
    "ss",
    "iw",
    // files (non-destructive)
    "ls",
    "stat",
    "du",
    "tree",
    "cat",
    "head",
    "tail",
    "wc",
];

/// Commands that expect a terminal (editors, pagers, remote shells,
/// multiplexers, watchers). Refused even in experimental mode.
pub const INTERACTIVE_COMMANDS: &[&str] = &[
    "vim", "vi", "nvim", "nano", "emacs", "top", "htop", "btop", "nvtop", "less", "more", "man",
    "ssh", "ftp", "telnet", "tmux", "screen", "watch",
];

/// Three-way authorization verdict for one candidate command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// First token cleared the mode's allow/deny rules.
    Permitted,
    /// Parsed fine, but the mode's rules refuse it.
    Denied,
    /// The command string could not be tokenized (unbalanced quoting).
    Unparsable,
}

/// Read-only execution settings snapshotted for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecPolicy {
    pub mode: ExecutionMode,
    /// Stable-mode allowlist override; the built-in set applies when empty.
    pub allowed_commands: Vec<String>,
    /// Wall-clock bound for one shell command.
    pub timeout: Duration,
}

/// Decide whether `command` may run under `mode`.
///
/// Tokenization follows shell word-splitting rules (quotes and escapes
/// respected). An empty token list is denied in both modes; the executor
/// treats a blank command as a no-op before authorization is ever reached.
pub fn authorize(command: &str, mode: ExecutionMode, custom_allowlist: &[String]) -> Verdict {
    let argv = match shell_words::split(command) {
        Ok(argv) => argv,
        Err(_) => return Verdict::Unparsable,
    };
    let Some(first) = argv.first() else {
        return Verdict::Denied;
    };

    let permitted = match mode {
        ExecutionMode::Stable => {
            if custom_allowlist.is_empty() {
                DEFAULT_ALLOWLIST.contains(&first.as_str())
            } else {
                custom_allowlist.iter().any(|allowed| allowed == first)
            }
        }
        ExecutionMode::Experimental => !INTERACTIVE_COMMANDS.contains(&first.as_str()),
    };

    if permitted {
        Verdict::Permitted
    } else {
        Verdict::Denied
    }
}

/// Boolean form of [`authorize`].
pub fn is_permitted(command: &str, mode: ExecutionMode, custom_allowlist: &[String]) -> bool {
    matches!(authorize(command, mode, custom_allowlist), Verdict::Permitted)
}

/// Advisory text attached to denied and unparsable commands.
pub fn denial_notice(mode: ExecutionMode) -> String {
    format!(
        "[DENIED] Command not allowed in {mode} mode\nEnable experimental mode to allow unrestricted execution."
    )
}
