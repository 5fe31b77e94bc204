//! Log entry model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logging channel an entry was written on.
///
/// `Info` and `Warn` are routed to the sink's stdout side, `Error` to its
/// stderr side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Ordinary output (`console.log`).
    Info,
    /// Warnings (`console.warn`).
    Warn,
    /// Errors (`console.error`).
    Error,
}

impl Channel {
    /// String representation of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Info => "info",
            Channel::Warn => "warn",
            Channel::Error => "error",
        }
    }

    /// Whether entries on this channel belong on the stderr side of the
    /// sink.
    pub fn is_error(&self) -> bool {
        matches!(self, Channel::Error)
    }
}

/// A single buffered logging call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Channel the entry was written on.
    pub channel: Channel,
    /// Entry text, without a trailing newline.
    pub text: String,
    /// When the logging call was made (not when it was flushed).
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(channel: Channel, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Byte cost of this entry against the buffer's auto-flush threshold.
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_str() {
        assert_eq!(Channel::Info.as_str(), "info");
        assert_eq!(Channel::Warn.as_str(), "warn");
        assert_eq!(Channel::Error.as_str(), "error");
    }

    #[test]
    fn test_channel_routing() {
        assert!(!Channel::Info.is_error());
        assert!(!Channel::Warn.is_error());
        assert!(Channel::Error.is_error());
    }

    #[test]
    fn test_entry_byte_len() {
        let entry = LogEntry::new(Channel::Info, "hello");
        assert_eq!(entry.byte_len(), 5);
        assert!(entry.timestamp <= Utc::now());
    }
}
