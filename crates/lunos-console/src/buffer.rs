//! The log buffer and its flush policy.
//!
//! [`ConsoleHandle`] is the cloneable handle a host hands to every
//! component that logs. All clones share one buffer; appends are
//! serialized so FIFO order is preserved, and a flush holds the same lock
//! for the whole drain so no entry is skipped or duplicated by concurrent
//! writers.
//!
//! ## Flush triggers
//!
//! 1. **Size** — `write` flushes before returning once the buffered byte
//!    count reaches [`ConsoleConfig::auto_flush_bytes`].
//! 2. **Explicit** — [`ConsoleHandle::flush`], wired to the script's
//!    `console.flush()`.
//! 3. **Shutdown** — [`ConsoleHandle::shutdown`] on normal host exit, with
//!    a `Drop` backstop on the shared buffer so entries survive even a
//!    host that forgets to call it.
//!
//! A time-based trigger is optional; see [`crate::flusher`].

use crate::entry::{Channel, LogEntry};
use crate::sink::{ConsoleSink, StdioSink};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Default byte threshold for the size-triggered auto-flush.
pub const DEFAULT_AUTO_FLUSH_BYTES: usize = 64 * 1024;

/// Tuning knobs for the buffer.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Buffered byte count at which `write` triggers an automatic flush.
    pub auto_flush_bytes: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            auto_flush_bytes: DEFAULT_AUTO_FLUSH_BYTES,
        }
    }
}

#[derive(Debug, Default)]
struct BufferState {
    entries: Vec<LogEntry>,
    bytes: usize,
    dirty: bool,
}

struct ConsoleBuffer {
    state: Mutex<BufferState>,
    sink: Arc<dyn ConsoleSink>,
    config: ConsoleConfig,
}

impl ConsoleBuffer {
    /// Lock the buffer state. A poisoned lock is recovered rather than
    /// propagated: logging must never be able to take down the host.
    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drain every buffered entry to the sink, FIFO, holding the lock for
    /// the duration. Returns the number of entries handed over.
    fn drain(&self, state: &mut BufferState) -> usize {
        if state.entries.is_empty() {
            return 0;
        }
        let drained = std::mem::take(&mut state.entries);
        state.bytes = 0;
        state.dirty = false;
        for entry in &drained {
            if let Err(e) = self.sink.write(entry.channel, &entry.text) {
                // Diagnostic channel only; a failing sink never aborts
                // script execution.
                warn!(channel = entry.channel.as_str(), "console sink write failed: {e}");
            }
        }
        drained.len()
    }
}

impl Drop for ConsoleBuffer {
    fn drop(&mut self) {
        // Final-flush guarantee: whatever is still buffered when the host
        // releases its last handle goes out now.
        let state = match self.state.get_mut() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let drained = std::mem::take(&mut state.entries);
        for entry in &drained {
            if let Err(e) = self.sink.write(entry.channel, &entry.text) {
                warn!("console sink write failed during teardown: {e}");
            }
        }
    }
}

/// Cloneable handle to the host's shared output buffer.
///
/// One buffer exists per running script host; embedders running several
/// hosts create one handle per host rather than sharing a global.
#[derive(Clone)]
pub struct ConsoleHandle {
    inner: Arc<ConsoleBuffer>,
}

impl ConsoleHandle {
    /// Buffer draining to the process stdout/stderr streams with default
    /// thresholds.
    pub fn stdio() -> Self {
        Self::with_sink(Arc::new(StdioSink::new()), ConsoleConfig::default())
    }

    /// Buffer draining to an arbitrary sink.
    pub fn with_sink(sink: Arc<dyn ConsoleSink>, config: ConsoleConfig) -> Self {
        Self {
            inner: Arc::new(ConsoleBuffer {
                state: Mutex::new(BufferState::default()),
                sink,
                config,
            }),
        }
    }

    /// Append one entry. Never fails; if the buffered byte count reaches
    /// the configured threshold, a flush runs before this call returns.
    pub fn write(&self, channel: Channel, text: impl Into<String>) {
        let entry = LogEntry::new(channel, text);
        let mut state = self.inner.lock();
        state.bytes += entry.byte_len();
        state.entries.push(entry);
        state.dirty = true;
        if state.bytes >= self.inner.config.auto_flush_bytes {
            self.inner.drain(&mut state);
        }
    }

    /// Drain all buffered entries to the sink in FIFO order.
    ///
    /// Returns the number of entries handed over; zero on an empty buffer
    /// (in which case the sink is not touched at all).
    pub fn flush(&self) -> usize {
        let mut state = self.inner.lock();
        self.inner.drain(&mut state)
    }

    /// Final flush on normal host shutdown.
    ///
    /// Equivalent to [`flush`](Self::flush); the separate name marks the
    /// lifecycle point after which no further writes are expected.
    pub fn shutdown(&self) -> usize {
        self.flush()
    }

    /// Number of entries currently buffered.
    pub fn buffered_entries(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Byte count currently buffered.
    pub fn buffered_bytes(&self) -> usize {
        self.inner.lock().bytes
    }

    /// Whether entries have been written since the last flush.
    pub fn is_dirty(&self) -> bool {
        self.inner.lock().dirty
    }
}
