//! Host configuration loading.
//!
//! Embedders describe a script environment in a small TOML document:
//!
//! ```toml
//! capabilities = ["process"]
//!
//! [console]
//! auto_flush_bytes = 65536
//! flush_interval_secs = 2
//!
//! [exec]
//! shell_program = "sh"
//! default_timeout_ms = 30000
//! ```
//!
//! Every field has a default, so an empty document (or none at all) is a
//! valid configuration: console only, no process capability.

use crate::capability::CapabilitySet;
use lunos_console::{ConsoleConfig, DEFAULT_AUTO_FLUSH_BYTES};
use lunos_exec::ExecConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid TOML for this schema.
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The document parsed but carries an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One script environment's host configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Capability strings granted to the environment.
    #[serde(default)]
    pub capabilities: Vec<String>,

    /// Console buffer settings.
    #[serde(default)]
    pub console: ConsoleSettings,

    /// Process executor settings.
    #[serde(default)]
    pub exec: ExecSettings,
}

/// Console buffer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    /// Byte threshold for the size-triggered auto-flush.
    #[serde(default = "default_auto_flush_bytes")]
    pub auto_flush_bytes: usize,

    /// Period of the optional background flusher; absent disables it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flush_interval_secs: Option<u64>,

    /// Colorize console values by type.
    #[serde(default)]
    pub colors: bool,
}

/// Process executor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecSettings {
    /// Shell used for shell-mode invocations that don't name one.
    #[serde(default = "default_shell_program")]
    pub shell_program: String,

    /// Timeout applied when an invocation carries none; absent means
    /// unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_timeout_ms: Option<u64>,
}

fn default_auto_flush_bytes() -> usize {
    DEFAULT_AUTO_FLUSH_BYTES
}

fn default_shell_program() -> String {
    "sh".to_string()
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            capabilities: Vec::new(),
            console: ConsoleSettings::default(),
            exec: ExecSettings::default(),
        }
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            auto_flush_bytes: default_auto_flush_bytes(),
            flush_interval_secs: None,
            colors: false,
        }
    }
}

impl Default for ExecSettings {
    fn default() -> Self {
        Self {
            shell_program: default_shell_program(),
            default_timeout_ms: None,
        }
    }
}

impl HostConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: HostConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.console.auto_flush_bytes == 0 {
            return Err(ConfigError::Invalid(
                "console.auto_flush_bytes must be positive".to_string(),
            ));
        }
        if self.exec.shell_program.is_empty() {
            return Err(ConfigError::Invalid(
                "exec.shell_program cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The capability set granted by this configuration.
    pub fn capability_set(&self) -> CapabilitySet {
        CapabilitySet::from_strings(&self.capabilities)
    }

    /// Console buffer configuration.
    pub fn console_config(&self) -> ConsoleConfig {
        ConsoleConfig {
            auto_flush_bytes: self.console.auto_flush_bytes,
        }
    }

    /// Period for the background flusher, if enabled.
    pub fn flush_interval(&self) -> Option<Duration> {
        self.console.flush_interval_secs.map(Duration::from_secs)
    }

    /// Executor configuration.
    pub fn exec_config(&self) -> ExecConfig {
        ExecConfig {
            shell_program: self.exec.shell_program.clone(),
            default_timeout: self.exec.default_timeout_ms.map(Duration::from_millis),
        }
    }
}
