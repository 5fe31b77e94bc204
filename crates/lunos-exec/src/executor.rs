//! Spawning, stream capture, and outcome classification.

use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::command::CommandSpec;
use crate::error::{ExecError, ExecResult};
use crate::output::ProcessOutput;

/// Executor-wide configuration.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Shell program used by [`CommandSpec::shell`] invocations that do
    /// not name one themselves.
    pub shell_program: String,
    /// Timeout applied when a spec carries none. `None` means an
    /// unlimited wait: a hung subprocess blocks its caller indefinitely.
    pub default_timeout: Option<std::time::Duration>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            shell_program: "sh".to_string(),
            default_timeout: None,
        }
    }
}

/// Runs external commands to completion and classifies the outcome.
///
/// Invocations are independent: each owns its own subprocess and stream
/// buffers, so concurrent `run` calls may execute in parallel. The
/// executor itself is cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    config: ExecConfig,
}

impl Executor {
    /// Executor with the given configuration.
    pub fn new(config: ExecConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Run a command to completion, capturing its output streams.
    ///
    /// Returns once the child has exited and both streams are drained —
    /// synchronous from the caller's point of view. Every failure path
    /// reaps the child before returning; no handle outlives the call.
    pub async fn run(&self, spec: &CommandSpec) -> ExecResult<ProcessOutput> {
        let start = Instant::now();
        let (program, args) = spec.argv(&self.config.shell_program);
        let cmd_text = spec.display_name(&self.config.shell_program);

        let span = tracing::info_span!(
            "exec.run",
            cmd = %cmd_text,
            mode = spec.mode().as_str(),
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );

        let mut command = Command::new(&program);
        command
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command.stdin(if spec.stdin_data().is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        if let Some(dir) = spec.cwd_path() {
            command.current_dir(dir);
        }
        for (key, value) in spec.env_vars() {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|source| ExecError::SpawnFailed {
            command: cmd_text.clone(),
            source,
        })?;

        // Drain both streams concurrently with the child's execution so a
        // chatty subprocess can never fill a pipe and deadlock against us.
        let stdout_task = tokio::spawn(drain(child.stdout.take()));
        let stderr_task = tokio::spawn(drain(child.stderr.take()));

        if let Some(data) = spec.stdin_data() {
            if let Some(mut stdin) = child.stdin.take() {
                let write_result = stdin.write_all(data.as_bytes()).await;
                drop(stdin); // close the pipe so the child sees EOF
                if let Err(source) = write_result {
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    stdout_task.abort();
                    stderr_task.abort();
                    return Err(ExecError::IoFailure {
                        command: cmd_text,
                        source,
                    });
                }
            }
        }

        let limit = spec.timeout_limit().or(self.config.default_timeout);
        let status = match limit {
            None => child.wait().await,
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status,
                Err(_elapsed) => {
                    // Forcible termination: kill, reap, discard any
                    // partial output.
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    stdout_task.abort();
                    stderr_task.abort();
                    span.record("duration_ms", start.elapsed().as_millis() as u64);
                    return Err(ExecError::Timeout {
                        command: cmd_text,
                        timeout: limit,
                    });
                }
            },
        };
        let status = status.map_err(|source| ExecError::IoFailure {
            command: cmd_text.clone(),
            source,
        })?;

        let stdout_bytes = join_drain(stdout_task, &cmd_text).await?;
        let stderr_bytes = join_drain(stderr_task, &cmd_text).await?;
        let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
        let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();

        let duration = start.elapsed();
        let exit_code = status.code().unwrap_or(-1);
        span.record("exit_code", exit_code);
        span.record("duration_ms", duration.as_millis() as u64);

        if !status.success() {
            return Err(ExecError::NonZeroExit {
                command: cmd_text,
                exit_code,
                stdout,
            });
        }

        let (output, diagnostics) = if spec.merges_stderr() {
            let mut merged = stdout;
            merged.push_str(&stderr);
            (merged, None)
        } else if stderr.is_empty() {
            (stdout, None)
        } else {
            (stdout, Some(stderr))
        };

        Ok(ProcessOutput {
            output,
            diagnostics,
            duration,
        })
    }
}

/// Read a child stream to EOF. Tolerates an absent handle so callers can
/// `take()` unconditionally.
async fn drain(
    stream: Option<impl tokio::io::AsyncRead + Unpin>,
) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

async fn join_drain(
    task: tokio::task::JoinHandle<std::io::Result<Vec<u8>>>,
    display: &str,
) -> ExecResult<Vec<u8>> {
    task.await
        .map_err(|e| ExecError::IoFailure {
            command: display.to_string(),
            source: std::io::Error::other(e),
        })?
        .map_err(|source| ExecError::IoFailure {
            command: display.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::Duration;

    fn executor() -> Executor {
        Executor::default()
    }

    #[tokio::test]
    async fn test_direct_success_captures_stdout() {
        let out = executor()
            .run(&CommandSpec::direct("echo").arg("hello"))
            .await
            .unwrap();
        assert_eq!(out.output, "hello\n");
        assert!(out.diagnostics.is_none());
    }

    #[tokio::test]
    async fn test_shell_success() {
        let out = executor()
            .run(&CommandSpec::shell("echo Hello, world!"))
            .await
            .unwrap();
        assert_eq!(out.output, "Hello, world!\n");
    }

    #[tokio::test]
    async fn test_direct_mode_does_not_expand() {
        // Direct spawn passes '$HOME' through verbatim; only a shell
        // would expand it.
        let out = executor()
            .run(&CommandSpec::direct("echo").arg("$HOME"))
            .await
            .unwrap();
        assert_eq!(out.output, "$HOME\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let err = executor()
            .run(&CommandSpec::shell("exit 3"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonZeroExit);
        assert_eq!(err.exit_code(), Some(3));
    }

    #[tokio::test]
    async fn test_non_zero_exit_keeps_stdout_in_message() {
        let err = executor()
            .run(&CommandSpec::shell("echo partial; exit 1"))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
        assert!(err.to_string().contains("partial"));
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let err = executor()
            .run(&CommandSpec::direct("definitely-not-a-real-program"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SpawnFailed);
        assert_eq!(err.exit_code(), None);
    }

    #[tokio::test]
    async fn test_stdin_is_fed_and_closed() {
        let out = executor()
            .run(&CommandSpec::direct("cat").stdin("fed via stdin"))
            .await
            .unwrap();
        assert_eq!(out.output, "fed via stdin");
    }

    #[tokio::test]
    async fn test_stderr_kept_as_diagnostics_on_success() {
        let out = executor()
            .run(&CommandSpec::shell("echo out; echo diag 1>&2"))
            .await
            .unwrap();
        assert_eq!(out.output, "out\n");
        assert_eq!(out.diagnostics.as_deref(), Some("diag\n"));
    }

    #[tokio::test]
    async fn test_merge_stderr_opt_in() {
        let out = executor()
            .run(
                &CommandSpec::shell("echo out; echo diag 1>&2").merge_stderr(true),
            )
            .await
            .unwrap();
        assert_eq!(out.output, "out\ndiag\n");
        assert!(out.diagnostics.is_none());
    }

    #[tokio::test]
    async fn test_timeout_kills_and_classifies() {
        let err = executor()
            .run(
                &CommandSpec::direct("sleep")
                    .arg("30")
                    .timeout(Duration::from_millis(50)),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_default_timeout_from_config() {
        let executor = Executor::new(ExecConfig {
            default_timeout: Some(Duration::from_millis(50)),
            ..ExecConfig::default()
        });
        let err = executor
            .run(&CommandSpec::direct("sleep").arg("30"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_current_dir_and_env() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let out = executor()
            .run(
                &CommandSpec::shell("printf '%s:%s' \"$(cat marker.txt)\" \"$MARKER\"")
                    .current_dir(dir.path())
                    .env("MARKER", "set"),
            )
            .await
            .unwrap();
        assert_eq!(out.output, "here:set");
    }

    #[tokio::test]
    async fn test_configured_shell_program() {
        let executor = Executor::new(ExecConfig {
            shell_program: "/bin/sh".to_string(),
            default_timeout: None,
        });
        let out = executor
            .run(&CommandSpec::shell("echo via configured shell"))
            .await
            .unwrap();
        assert_eq!(out.output, "via configured shell\n");
    }

    #[tokio::test]
    async fn test_concurrent_runs_are_independent() {
        let executor = executor();
        let spec_one = CommandSpec::shell("echo one");
        let spec_two = CommandSpec::shell("echo two");
        let spec_three = CommandSpec::shell("exit 7");
        let (a, b, c) = tokio::join!(
            executor.run(&spec_one),
            executor.run(&spec_two),
            executor.run(&spec_three),
        );
        assert_eq!(a.unwrap().output, "one\n");
        assert_eq!(b.unwrap().output, "two\n");
        assert_eq!(c.unwrap_err().exit_code(), Some(7));
    }
}
