//! # lunos-host-api
//!
//! The host capability bridge of the Lunos script host.
//!
//! This crate is the thin binding layer between a running script and the
//! host capabilities implemented in [`lunos-console`](lunos_console) and
//! [`lunos-exec`](lunos_exec). It allows the embedding runtime to:
//!
//! - expose `console.log` / `console.warn` / `console.error` /
//!   `console.flush` backed by the buffered console,
//! - expose `lunos.shell` backed by the process executor, returning a
//!   `{ result, error }` record instead of throwing,
//! - hand the module loader a [`HostRegistry`] of fully-resolved callable
//!   bindings before any script code runs.
//!
//! ## Error contract
//!
//! Host capability failures are data: a failed shell invocation comes
//! back with a populated `error` field, and a failing console sink is
//! reported on the host's diagnostic channel. Only malformed calls into
//! the bridge — wrong arity, wrong argument types, a capability the host
//! never granted — produce a [`BridgeError`], the one category an engine
//! may legitimately surface as a script exception.
//!
//! ## Quick start
//!
//! ```no_run
//! use lunos_console::ConsoleHandle;
//! use lunos_exec::Executor;
//! use lunos_host_api::{bind_host_functions, CapabilityBridge, CapabilitySet, Value};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), lunos_host_api::BridgeError> {
//! let bridge = Arc::new(CapabilityBridge::new(
//!     ConsoleHandle::stdio(),
//!     Executor::default(),
//!     CapabilitySet::from_strings(["process"]),
//! ));
//! let registry = bind_host_functions(bridge);
//!
//! // The loader delivers these bindings to the script; a call looks like:
//! let record = registry
//!     .call("lunos.shell", vec!["sh".into(), "echo hi".into()])
//!     .await?;
//! assert!(record.get("result").is_some());
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod capability;
pub mod config;
pub mod error;
pub mod registry;
pub mod render;
pub mod value;

pub use bridge::CapabilityBridge;
pub use capability::{Capability, CapabilitySet};
pub use config::{ConfigError, HostConfig};
pub use error::{BridgeError, BridgeResult};
pub use registry::{bind_host_functions, HostFunction, HostRegistry};
pub use value::Value;
