//! Process execution boundary
//!
//! Everything that reaches an external binary goes through [`OsExecutor`].
//! The kubectl wrapper only builds argument vectors and reads the captured
//! output; spawning, piping and exit-code handling live here.

use async_trait::async_trait;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured output of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecOutput {
    pub fn new(stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Failure reported by an executor.
///
/// Values are comparable so callers can check that an error came back
/// exactly as the executor produced it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecError {
    #[error("failed to start {binary}: {message}")]
    Spawn { binary: String, message: String },
    #[error("{} exited with status {}: {}", .binary, display_code(.code), String::from_utf8_lossy(.stderr).trim())]
    Exit {
        binary: String,
        code: Option<i32>,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
    #[error("I/O error while running {binary}: {message}")]
    Io { binary: String, message: String },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// Runs a named binary with arguments, environment overrides and stdin.
///
/// `env` entries are `KEY=VALUE` strings applied on top of the inherited
/// environment; an empty slice means no overrides. An empty `stdin` means
/// nothing is written to the child.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OsExecutor: Send + Sync {
    async fn execute(
        &self,
        binary: &str,
        args: &[String],
        env: &[String],
        stdin: &str,
    ) -> Result<ExecOutput, ExecError>;
}

/// Executor backed by `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl OsExecutor for ProcessExecutor {
    async fn execute(
        &self,
        binary: &str,
        args: &[String],
        env: &[String],
        stdin: &str,
    ) -> Result<ExecOutput, ExecError> {
        debug!(binary, ?args, env_overrides = env.len(), "executing command");

        let mut command = Command::new(binary);
        command
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if stdin.is_empty() { Stdio::null() } else { Stdio::piped() })
            .kill_on_drop(true);

        for entry in env {
            let (key, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|e| {
            warn!(binary, error = %e, "failed to spawn command");
            ExecError::Spawn {
                binary: binary.to_string(),
                message: e.to_string(),
            }
        })?;

        // stdin is written from its own task while stdout/stderr are drained
        let writer = child.stdin.take().map(|mut handle| {
            let input = stdin.as_bytes().to_vec();
            tokio::spawn(async move {
                handle.write_all(&input).await?;
                handle.shutdown().await
            })
        });

        let output = child.wait_with_output().await.map_err(|e| ExecError::Io {
            binary: binary.to_string(),
            message: e.to_string(),
        })?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                // Child exited without reading all of its input
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(ExecError::Io {
                        binary: binary.to_string(),
                        message: format!("failed to write stdin: {}", e),
                    })
                }
                Err(e) => {
                    return Err(ExecError::Io {
                        binary: binary.to_string(),
                        message: format!("stdin writer task failed: {}", e),
                    })
                }
            }
        }

        if !output.status.success() {
            let error = ExecError::Exit {
                binary: binary.to_string(),
                code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            };
            warn!(binary, error = %error, "command failed");
            return Err(error);
        }

        Ok(ExecOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_error_message_uses_trimmed_stderr() {
        let error = ExecError::Exit {
            binary: "kubectl".to_string(),
            code: Some(1),
            stdout: Vec::new(),
            stderr: b"Error from server (NotFound): jobs.batch \"foo\" not found\n".to_vec(),
        };
        assert_eq!(
            error.to_string(),
            "kubectl exited with status 1: Error from server (NotFound): jobs.batch \"foo\" not found"
        );
    }

    #[test]
    fn test_exit_error_without_code_reports_signal() {
        let error = ExecError::Exit {
            binary: "kubectl".to_string(),
            code: None,
            stdout: Vec::new(),
            stderr: Vec::new(),
        };
        assert_eq!(error.to_string(), "kubectl exited with status signal: ");
    }

    #[tokio::test]
    async fn test_spawn_failure_for_missing_binary() {
        let result = ProcessExecutor::new()
            .execute("nonexistent_binary_12345", &[], &[], "")
            .await;
        assert!(matches!(result, Err(ExecError::Spawn { .. })));
    }
}
