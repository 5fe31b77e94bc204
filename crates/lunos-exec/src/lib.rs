//! # lunos-exec
//!
//! Synchronous external-process execution for the Lunos script host.
//!
//! A script asks the host to run a command; the call returns only after
//! the subprocess has exited and both of its output streams are fully
//! drained. The outcome is always data — [`ExecResult`] — never a panic
//! across the host boundary: process failure is an expected, first-class
//! result, not an exceptional one.
//!
//! ## Spawn modes
//!
//! [`CommandSpec::direct`] spawns a program with an argument vector and
//! no shell in between (the safe default). [`CommandSpec::shell`] hands a
//! pre-formed command line to a shell (`sh -c <line>` by default) and is
//! an explicit opt-in, because the two modes have materially different
//! quoting and injection semantics.
//!
//! ## Lifecycle
//!
//! Each invocation moves through `Spawning → Running → Succeeded |
//! Failed`; a spawn error goes straight to `Failed`. Every path — success,
//! non-zero exit, timeout, I/O failure — reaps the child and closes its
//! stream handles before `run` returns.

pub mod command;
pub mod error;
pub mod executor;
pub mod output;

pub use command::{CommandSpec, SpawnMode};
pub use error::{ErrorKind, ExecError, ExecResult};
pub use executor::{ExecConfig, Executor};
pub use output::ProcessOutput;
