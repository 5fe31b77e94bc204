//! Error types for process execution.

use serde::{Deserialize, Serialize};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Classification of an execution failure, stable across the host
/// boundary. This is what gets marshaled into the script-visible
/// `error.kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The command could not be started at all.
    SpawnFailed,
    /// The command ran to completion but exited non-zero.
    NonZeroExit,
    /// Reading the child's streams (or feeding its stdin) failed.
    IoFailure,
    /// The command outlived its timeout and was killed.
    Timeout,
}

impl ErrorKind {
    /// String representation, matching the serde casing.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::SpawnFailed => "spawn_failed",
            ErrorKind::NonZeroExit => "non_zero_exit",
            ErrorKind::IoFailure => "io_failure",
            ErrorKind::Timeout => "timeout",
        }
    }
}

/// A failed command invocation.
///
/// Constructed once per invocation and owned by the caller; never thrown
/// across the script boundary.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Spawning failed before the command ever ran (not found, permission
    /// denied). There is no partial output.
    #[error("failed to spawn '{command}': {source}")]
    SpawnFailed {
        /// Display form of the attempted command.
        command: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The command exited with a non-zero code. Anything it printed to
    /// stdout is attached to the message rather than silently discarded.
    #[error("'{command}' exited with code {exit_code}{}", stdout_note(.stdout))]
    NonZeroExit {
        /// Display form of the command.
        command: String,
        /// The child's exit code (`-1` if terminated by a signal).
        exit_code: i32,
        /// Captured stdout, kept for diagnosability.
        stdout: String,
    },

    /// Stream capture or stdin feeding failed mid-flight.
    #[error("i/o failure while running '{command}': {source}")]
    IoFailure {
        /// Display form of the command.
        command: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// The timeout expired; the child was killed and reaped, and any
    /// partial output discarded.
    #[error("'{command}' timed out after {timeout:?}")]
    Timeout {
        /// Display form of the command.
        command: String,
        /// The limit that expired.
        timeout: Duration,
    },
}

fn stdout_note(stdout: &str) -> String {
    if stdout.is_empty() {
        String::new()
    } else {
        format!(" (stdout: {})", stdout.trim_end())
    }
}

impl ExecError {
    /// The failure classification.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecError::SpawnFailed { .. } => ErrorKind::SpawnFailed,
            ExecError::NonZeroExit { .. } => ErrorKind::NonZeroExit,
            ExecError::IoFailure { .. } => ErrorKind::IoFailure,
            ExecError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// The child's exit code, when it got far enough to have one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ExecError::NonZeroExit { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Display form of the command that failed.
    pub fn command(&self) -> &str {
        match self {
            ExecError::SpawnFailed { command, .. }
            | ExecError::NonZeroExit { command, .. }
            | ExecError::IoFailure { command, .. }
            | ExecError::Timeout { command, .. } => command,
        }
    }
}

/// Result type for executor operations.
pub type ExecResult<T> = std::result::Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = ExecError::SpawnFailed {
            command: "missing".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.kind(), ErrorKind::SpawnFailed);
        assert_eq!(err.exit_code(), None);
        assert_eq!(err.command(), "missing");
    }

    #[test]
    fn test_non_zero_exit_message_carries_stdout() {
        let err = ExecError::NonZeroExit {
            command: "build".to_string(),
            exit_code: 2,
            stdout: "3 errors\n".to_string(),
        };
        assert_eq!(err.exit_code(), Some(2));
        let message = err.to_string();
        assert!(message.contains("exited with code 2"));
        assert!(message.contains("3 errors"));
    }

    #[test]
    fn test_non_zero_exit_message_without_stdout() {
        let err = ExecError::NonZeroExit {
            command: "quiet".to_string(),
            exit_code: 1,
            stdout: String::new(),
        };
        assert_eq!(err.to_string(), "'quiet' exited with code 1");
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(ErrorKind::SpawnFailed.as_str(), "spawn_failed");
        assert_eq!(ErrorKind::NonZeroExit.as_str(), "non_zero_exit");
        assert_eq!(ErrorKind::IoFailure.as_str(), "io_failure");
        assert_eq!(ErrorKind::Timeout.as_str(), "timeout");
    }
}
