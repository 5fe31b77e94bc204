//! Bridge-level errors.
//!
//! These are the only failures the bridge reports by `Err` instead of by
//! data in the returned record. They represent programming errors in the
//! calling script (or its host configuration), so the engine may surface
//! them as script exceptions.

use crate::value::Value;
use thiserror::Error;

/// A malformed call into the bridge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// Wrong arity or argument type.
    #[error("{function}: expected {expected}, got {got}")]
    InvalidArguments {
        /// The host function that was called.
        function: &'static str,
        /// What the function accepts.
        expected: &'static str,
        /// What it was actually given.
        got: String,
    },

    /// The host never granted the capability this function needs.
    #[error("missing capability: {0}")]
    MissingCapability(String),

    /// No host function is registered under this name.
    #[error("unknown host function: {0}")]
    UnknownFunction(String),
}

impl BridgeError {
    /// Invalid-arguments error describing the offending value by type.
    pub fn invalid_argument(
        function: &'static str,
        expected: &'static str,
        got: &Value,
    ) -> Self {
        BridgeError::InvalidArguments {
            function,
            expected,
            got: got.type_name().to_string(),
        }
    }

    /// Invalid-arguments error for a wrong argument count.
    pub fn invalid_arity(function: &'static str, expected: &'static str, got: usize) -> Self {
        BridgeError::InvalidArguments {
            function,
            expected,
            got: format!("{got} argument(s)"),
        }
    }
}

/// Result type for bridge operations.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_the_type() {
        let err = BridgeError::invalid_argument("lunos.shell", "a string", &Value::Number(4.0));
        assert_eq!(
            err.to_string(),
            "lunos.shell: expected a string, got number"
        );
    }

    #[test]
    fn test_invalid_arity_message() {
        let err = BridgeError::invalid_arity("lunos.shell", "1 to 3 arguments", 0);
        assert_eq!(
            err.to_string(),
            "lunos.shell: expected 1 to 3 arguments, got 0 argument(s)"
        );
    }
}
