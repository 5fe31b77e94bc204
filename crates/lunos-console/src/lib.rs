//! # lunos-console
//!
//! Buffered console output for the Lunos script host.
//!
//! Scripts log at a much higher frequency than a terminal can usefully
//! absorb, so logging calls append to an in-memory buffer and the actual
//! writes to the output sink happen in batches. The buffer guarantees that
//! no entry is ever silently lost:
//!
//! - appends and flushes preserve call order (FIFO),
//! - a flush runs automatically once the buffer crosses its configured
//!   byte threshold,
//! - a final flush runs when the host shuts down (explicitly via
//!   [`ConsoleHandle::shutdown`], or as a backstop when the last handle
//!   is dropped).
//!
//! An optional time-based trigger is available as [`IntervalFlusher`].
//!
//! ## Channels
//!
//! Entries carry a [`Channel`]: `Info` and `Warn` are delivered to the
//! stdout side of the sink, `Error` to the stderr side. Sink failures are
//! reported on the host's own diagnostic channel (`tracing`) and never
//! propagate back into script execution.

pub mod buffer;
pub mod entry;
pub mod flusher;
pub mod sink;

pub use buffer::{ConsoleConfig, ConsoleHandle, DEFAULT_AUTO_FLUSH_BYTES};
pub use entry::{Channel, LogEntry};
pub use flusher::IntervalFlusher;
pub use sink::{ConsoleSink, MemorySink, StdioSink};
