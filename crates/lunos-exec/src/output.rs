//! Captured output of a successfully completed command.

use std::time::Duration;

/// What a zero-exit command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// The child's captured stdout text (plus stderr, if the spec asked
    /// for merging).
    pub output: String,
    /// The child's stderr text when it exited zero anyway — supplementary
    /// diagnostics, kept out of `output` by default. `None` when stderr
    /// was empty or merged.
    pub diagnostics: Option<String>,
    /// Wall-clock time from spawn to fully drained streams.
    pub duration: Duration,
}
