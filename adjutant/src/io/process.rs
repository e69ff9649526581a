//! Bounded shell invocation without pipe deadlocks.
//!
//! Spawns one child per call through `bash -c`, drains stdout and stderr on
//! reader threads while the child runs, and kills the child when the timeout
//! expires instead of abandoning the wait.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, instrument, warn};
use wait_timeout::ChildExt;

/// What one bounded invocation produced.
#[derive(Debug)]
pub enum ShellOutcome {
    /// Child exited on its own within the timeout.
    Completed { stdout: String, stderr: String },
    /// Child was killed and reaped after the timeout expired.
    TimedOut,
}

/// Run `command` through the shell, waiting at most `timeout`.
///
/// Errors are I/O level only (spawn or pipe failures); a non-zero exit status
/// is not an error here, the merge layer decides what the caller sees.
#[instrument(skip_all, fields(timeout_secs = timeout.as_secs()))]
pub fn run_shell(command: &str, timeout: Duration) -> io::Result<ShellOutcome> {
    debug!("spawning shell child");
    let mut child = Command::new("bash")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream(stdout));
    let stderr_handle = thread::spawn(move || read_stream(stderr));

    let timed_out = match child.wait_timeout(timeout)? {
        Some(status) => {
            debug!(exit_code = ?status.code(), "command finished");
            false
        }
        None => {
            warn!(timeout_secs = timeout.as_secs(), "command timed out, killing");
            child.kill()?;
            child.wait()?;
            true
        }
    };

    // Killing the child closes its pipes, so the readers always terminate.
    let stdout = join_reader(stdout_handle)?;
    let stderr = join_reader(stderr_handle)?;

    if timed_out {
        return Ok(ShellOutcome::TimedOut);
    }
    Ok(ShellOutcome::Completed { stdout, stderr })
}

fn join_reader(handle: thread::JoinHandle<io::Result<String>>) -> io::Result<String> {
    handle
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))?
}

fn read_stream<R: Read>(mut reader: R) -> io::Result<String> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn captures_stdout() {
        let outcome = run_shell("printf out", Duration::from_secs(5)).expect("run");
        match outcome {
            ShellOutcome::Completed { stdout, stderr } => {
                assert_eq!(stdout, "out");
                assert_eq!(stderr, "");
            }
            ShellOutcome::TimedOut => panic!("unexpected timeout"),
        }
    }

    #[test]
    fn captures_stderr_separately() {
        let outcome = run_shell("printf err 1>&2", Duration::from_secs(5)).expect("run");
        match outcome {
            ShellOutcome::Completed { stdout, stderr } => {
                assert_eq!(stdout, "");
                assert_eq!(stderr, "err");
            }
            ShellOutcome::TimedOut => panic!("unexpected timeout"),
        }
    }

    /// Verifies the child is killed at the deadline rather than waited out:
    /// a 5-second sleep under a 1-second timeout must return well before the
    /// sleep would have finished.
    #[test]
    fn kills_child_on_timeout() {
        let started = Instant::now();
        let outcome = run_shell("sleep 5", Duration::from_secs(1)).expect("run");
        assert!(matches!(outcome, ShellOutcome::TimedOut));
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "child should have been killed at the timeout"
        );
    }

    #[test]
    fn nonzero_exit_is_not_an_error() {
        let outcome = run_shell("exit 7", Duration::from_secs(5)).expect("run");
        assert!(matches!(outcome, ShellOutcome::Completed { .. }));
    }
}
