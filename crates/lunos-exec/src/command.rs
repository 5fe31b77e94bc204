//! Command specifications.
//!
//! A [`CommandSpec`] describes everything about one invocation: what to
//! run, how to hand it to the OS ([`SpawnMode`]), what to feed it, and
//! the limits it runs under.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// How the executor hands a command to the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    /// Spawn the program directly with its argument vector. Arguments
    /// reach the program verbatim; no shell interpretation happens. This
    /// is the safe default.
    Direct,
    /// Hand a pre-formed command line to a shell as `<shell> -c <line>`.
    /// The line is subject to the shell's quoting, expansion, and
    /// injection semantics, so this mode is an explicit opt-in.
    Shell,
}

impl SpawnMode {
    /// String representation, matching the serde casing.
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnMode::Direct => "direct",
            SpawnMode::Shell => "shell",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Invocation {
    Direct {
        program: String,
        args: Vec<String>,
    },
    Shell {
        /// Shell program override; `None` uses the executor's configured
        /// shell.
        shell: Option<String>,
        command_line: String,
    },
}

/// Specification of a single command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    invocation: Invocation,
    stdin: Option<String>,
    timeout: Option<Duration>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
    merge_stderr: bool,
}

impl CommandSpec {
    fn from_invocation(invocation: Invocation) -> Self {
        Self {
            invocation,
            stdin: None,
            timeout: None,
            cwd: None,
            env: Vec::new(),
            merge_stderr: false,
        }
    }

    /// Spawn `program` directly, without a shell.
    pub fn direct(program: impl Into<String>) -> Self {
        Self::from_invocation(Invocation::Direct {
            program: program.into(),
            args: Vec::new(),
        })
    }

    /// Run `command_line` through the executor's configured shell.
    pub fn shell(command_line: impl Into<String>) -> Self {
        Self::from_invocation(Invocation::Shell {
            shell: None,
            command_line: command_line.into(),
        })
    }

    /// Run `command_line` through a specific shell program.
    pub fn shell_with(shell: impl Into<String>, command_line: impl Into<String>) -> Self {
        Self::from_invocation(Invocation::Shell {
            shell: Some(shell.into()),
            command_line: command_line.into(),
        })
    }

    /// Append one argument. Only meaningful in direct mode; a shell
    /// invocation carries its whole command in the line itself.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        if let Invocation::Direct { args, .. } = &mut self.invocation {
            args.push(arg.into());
        }
        self
    }

    /// Append several arguments (direct mode).
    pub fn args<I, S>(mut self, new_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Invocation::Direct { args, .. } = &mut self.invocation {
            args.extend(new_args.into_iter().map(Into::into));
        }
        self
    }

    /// Text fed to the child's stdin; the pipe is closed after writing.
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Kill the child if it runs longer than this.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Working directory for the child.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add one environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Append the child's stderr text to the captured output instead of
    /// keeping it as separate diagnostics. Off by default; when merged,
    /// stderr is concatenated after stdout rather than interleaved.
    pub fn merge_stderr(mut self, merge: bool) -> Self {
        self.merge_stderr = merge;
        self
    }

    /// The spawn mode of this spec.
    pub fn mode(&self) -> SpawnMode {
        match self.invocation {
            Invocation::Direct { .. } => SpawnMode::Direct,
            Invocation::Shell { .. } => SpawnMode::Shell,
        }
    }

    /// Resolve to the `(program, argv)` pair actually spawned, given the
    /// executor's default shell.
    pub(crate) fn argv(&self, default_shell: &str) -> (String, Vec<String>) {
        match &self.invocation {
            Invocation::Direct { program, args } => (program.clone(), args.clone()),
            Invocation::Shell {
                shell,
                command_line,
            } => (
                shell.clone().unwrap_or_else(|| default_shell.to_string()),
                vec!["-c".to_string(), command_line.clone()],
            ),
        }
    }

    /// Human-readable form of the command, for error messages and spans.
    pub fn display_name(&self, default_shell: &str) -> String {
        match &self.invocation {
            Invocation::Direct { program, args } => {
                if args.is_empty() {
                    program.clone()
                } else {
                    format!("{} {}", program, args.join(" "))
                }
            }
            Invocation::Shell {
                shell,
                command_line,
            } => format!(
                "{} -c '{}'",
                shell.as_deref().unwrap_or(default_shell),
                command_line
            ),
        }
    }

    pub(crate) fn stdin_data(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    pub(crate) fn timeout_limit(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn cwd_path(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub(crate) fn env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    pub(crate) fn merges_stderr(&self) -> bool {
        self.merge_stderr
    }
}
