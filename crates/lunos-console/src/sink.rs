//! Output sinks for flushed log entries.
//!
//! A [`ConsoleSink`] is where drained entries end up. The production sink
//! is [`StdioSink`], which writes to the process stdout/stderr streams;
//! [`MemorySink`] captures entries for inspection in tests.

use crate::entry::Channel;
use std::io::{self, Write};
use std::sync::Mutex;

/// ANSI prefix for warnings, matching the host's terminal styling.
const WARN_PREFIX: &str = "\x1b[33mWARNING:\x1b[0m ";
/// ANSI prefix for errors.
const ERROR_PREFIX: &str = "\x1b[31mERROR:\x1b[0m ";

/// Destination for drained log entries.
///
/// Implementations receive entries one at a time, in flush order. A sink
/// only promises to accept the data; durability (e.g. terminal line
/// buffering) is the sink's own business.
pub trait ConsoleSink: Send + Sync {
    /// Deliver one entry's text on the given channel.
    fn write(&self, channel: Channel, text: &str) -> io::Result<()>;
}

/// Sink that writes to the process stdout and stderr streams.
///
/// `Info` and `Warn` entries go to stdout (warnings with a colored
/// `WARNING:` prefix), `Error` entries to stderr with an `ERROR:` prefix.
#[derive(Debug)]
pub struct StdioSink {
    color: bool,
}

impl StdioSink {
    /// Sink with ANSI-colored channel prefixes.
    pub fn new() -> Self {
        Self { color: true }
    }

    /// Sink without ANSI escapes, for dumb terminals and pipes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    fn prefix(&self, channel: Channel) -> &'static str {
        match (channel, self.color) {
            (Channel::Warn, true) => WARN_PREFIX,
            (Channel::Warn, false) => "WARNING: ",
            (Channel::Error, true) => ERROR_PREFIX,
            (Channel::Error, false) => "ERROR: ",
            (Channel::Info, _) => "",
        }
    }
}

impl Default for StdioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink for StdioSink {
    fn write(&self, channel: Channel, text: &str) -> io::Result<()> {
        let prefix = self.prefix(channel);
        if channel.is_error() {
            let stderr = io::stderr();
            let mut out = stderr.lock();
            writeln!(out, "{prefix}{text}")
        } else {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "{prefix}{text}")
        }
    }
}

/// Sink that records entries in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(Channel, String)>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far, in write order.
    pub fn records(&self) -> Vec<(Channel, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of writes received.
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether the sink has received no writes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Just the texts, ignoring channels.
    pub fn texts(&self) -> Vec<String> {
        self.records()
            .into_iter()
            .map(|(_, text)| text)
            .collect()
    }
}

impl ConsoleSink for MemorySink {
    fn write(&self, channel: Channel, text: &str) -> io::Result<()> {
        if let Ok(mut records) = self.records.lock() {
            records.push((channel, text.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.write(Channel::Info, "first").unwrap();
        sink.write(Channel::Error, "second").unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], (Channel::Info, "first".to_string()));
        assert_eq!(records[1], (Channel::Error, "second".to_string()));
    }

    #[test]
    fn test_stdio_sink_accepts_all_channels() {
        let sink = StdioSink::plain();
        sink.write(Channel::Info, "info line").unwrap();
        sink.write(Channel::Warn, "warn line").unwrap();
        sink.write(Channel::Error, "error line").unwrap();
    }

    #[test]
    fn test_stdio_prefixes() {
        let colored = StdioSink::new();
        assert!(colored.prefix(Channel::Warn).contains("\x1b[33m"));
        assert!(colored.prefix(Channel::Error).contains("\x1b[31m"));
        assert_eq!(colored.prefix(Channel::Info), "");

        let plain = StdioSink::plain();
        assert_eq!(plain.prefix(Channel::Warn), "WARNING: ");
        assert_eq!(plain.prefix(Channel::Error), "ERROR: ");
    }
}
