//! Host function registry.
//!
//! The module loader pulls fully-resolved callable bindings from a
//! [`HostRegistry`] before any script code referencing them runs. Each
//! binding is a [`HostFunction`]: either a synchronous closure (the
//! console family) or an asynchronous one (`lunos.shell`, which suspends
//! the calling task until the subprocess exits).

use crate::bridge::CapabilityBridge;
use crate::error::{BridgeError, BridgeResult};
use crate::value::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

/// Future returned by asynchronous host functions.
pub type BoxedValueFuture = Pin<Box<dyn Future<Output = BridgeResult<Value>> + Send>>;

/// A callable host binding.
#[derive(Clone)]
pub enum HostFunction {
    /// Returns immediately.
    Sync(Arc<dyn Fn(&[Value]) -> BridgeResult<Value> + Send + Sync>),
    /// Suspends the calling script task until the host operation
    /// completes.
    Async(Arc<dyn Fn(Vec<Value>) -> BoxedValueFuture + Send + Sync>),
}

impl HostFunction {
    /// Wrap a synchronous closure.
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> BridgeResult<Value> + Send + Sync + 'static,
    {
        HostFunction::Sync(Arc::new(f))
    }

    /// Wrap an asynchronous closure.
    pub fn asynchronous<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> BoxedValueFuture + Send + Sync + 'static,
    {
        HostFunction::Async(Arc::new(f))
    }

    /// Invoke the binding.
    pub async fn call(&self, args: Vec<Value>) -> BridgeResult<Value> {
        match self {
            HostFunction::Sync(f) => f(&args),
            HostFunction::Async(f) => f(args).await,
        }
    }
}

/// Named host bindings for one script environment.
#[derive(Default)]
pub struct HostRegistry {
    functions: HashMap<String, HostFunction>,
}

impl HostRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding under a dotted name. Re-registering a name
    /// replaces the previous binding.
    pub fn register(&mut self, name: impl Into<String>, function: HostFunction) {
        let name = name.into();
        debug!(name = %name, "registered host function");
        self.functions.insert(name, function);
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&HostFunction> {
        self.functions.get(name)
    }

    /// Registered names, sorted for stable display.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Invoke a binding by name.
    pub async fn call(&self, name: &str, args: Vec<Value>) -> BridgeResult<Value> {
        match self.get(name) {
            Some(function) => function.call(args).await,
            None => Err(BridgeError::UnknownFunction(name.to_string())),
        }
    }
}

/// Bind the standard host functions of a [`CapabilityBridge`].
///
/// This is what the loader hands to scripts: `console.log`,
/// `console.warn`, `console.error`, `console.flush`, and `lunos.shell`.
pub fn bind_host_functions(bridge: Arc<CapabilityBridge>) -> HostRegistry {
    let mut registry = HostRegistry::new();

    let b = bridge.clone();
    registry.register(
        "console.log",
        HostFunction::sync(move |args| b.console_log(args)),
    );
    let b = bridge.clone();
    registry.register(
        "console.warn",
        HostFunction::sync(move |args| b.console_warn(args)),
    );
    let b = bridge.clone();
    registry.register(
        "console.error",
        HostFunction::sync(move |args| b.console_error(args)),
    );
    let b = bridge.clone();
    registry.register(
        "console.flush",
        HostFunction::sync(move |args| b.console_flush(args)),
    );
    registry.register(
        "lunos.shell",
        HostFunction::asynchronous(move |args| {
            let bridge = bridge.clone();
            Box::pin(async move { bridge.shell(&args).await })
        }),
    );

    registry
}
