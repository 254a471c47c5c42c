//! # Command Runner
//!
//! Runs an OS command and returns its standard output. Every failure mode
//! (spawn error, timeout, non-zero exit, non-UTF-8 output) becomes a probe
//! error.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MonitorError, MonitorResult};

/// Runs OS commands for the prober.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` and returns its stdout.
    async fn run(&self, program: &str, args: &[&str]) -> MonitorResult<String>;
}

/// Runs commands as child processes bounded by a timeout.
///
/// The child is killed when the timeout elapses or the calling future is
/// dropped.
#[derive(Debug, Clone)]
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    pub fn new(timeout: Duration) -> Self {
        TokioCommandRunner { timeout }
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> MonitorResult<String> {
        debug!(program, ?args, "Running printer command");

        let mut command = Command::new(program);
        command
            .args(args)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // CREATE_NO_WINDOW: no console flashes up behind the app.
        #[cfg(windows)]
        command.creation_flags(0x0800_0000);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| MonitorError::ProbeTimeout {
                command: program.to_string(),
                secs: self.timeout.as_secs(),
            })?
            .map_err(|e| MonitorError::Probe(format!("failed to run {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MonitorError::Probe(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| MonitorError::Probe(format!("{} produced non-UTF-8 output", program)))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout() {
        let runner = TokioCommandRunner::new(Duration::from_secs(5));
        let out = runner.run("sh", &["-c", "echo printer A is idle."]).await.unwrap();
        assert_eq!(out.trim(), "printer A is idle.");
    }

    #[tokio::test]
    async fn test_locale_is_pinned() {
        let runner = TokioCommandRunner::new(Duration::from_secs(5));
        let out = runner.run("sh", &["-c", "echo $LC_ALL"]).await.unwrap();
        assert_eq!(out.trim(), "C");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_probe_error() {
        let runner = TokioCommandRunner::new(Duration::from_secs(5));
        let err = runner
            .run("sh", &["-c", "echo nope >&2; exit 3"])
            .await
            .unwrap_err();
        assert!(err.is_probe_error());
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn test_missing_program_is_probe_error() {
        let runner = TokioCommandRunner::new(Duration::from_secs(5));
        let err = runner
            .run("printdesk-definitely-not-a-command", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, MonitorError::Probe(_)));
    }

    #[tokio::test]
    async fn test_timeout() {
        let runner = TokioCommandRunner::new(Duration::from_millis(100));
        let err = runner.run("sleep", &["5"]).await.unwrap_err();
        assert!(matches!(err, MonitorError::ProbeTimeout { .. }));
    }
}
