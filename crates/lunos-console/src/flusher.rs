//! Optional time-based flushing.
//!
//! The size and shutdown triggers in [`crate::buffer`] are the required
//! contracts; an [`IntervalFlusher`] adds a periodic drain on top so
//! long-idle scripts see their output without an explicit
//! `console.flush()`. The task shuts down over a broadcast channel and
//! performs one last flush on the way out.

use crate::buffer::ConsoleHandle;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::debug;

/// Background task flushing a [`ConsoleHandle`] on a fixed period.
pub struct IntervalFlusher {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl IntervalFlusher {
    /// Spawn the flusher onto the current tokio runtime.
    pub fn spawn(handle: ConsoleHandle, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
        let task = tokio::spawn(async move {
            let mut tick = interval(period);
            // The first tick completes immediately; skip it so the first
            // real flush happens one full period after spawn.
            tick.tick().await;
            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let flushed = handle.flush();
                        if flushed > 0 {
                            debug!(flushed, "interval flush");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        handle.flush();
                        break;
                    }
                }
            }
        });
        Self { shutdown_tx, task }
    }

    /// Stop the task, flushing once more before it exits.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.task.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{ConsoleConfig, ConsoleHandle};
    use crate::entry::Channel;
    use crate::sink::MemorySink;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_interval_flush_drains_buffer() {
        let sink = Arc::new(MemorySink::new());
        let handle = ConsoleHandle::with_sink(sink.clone(), ConsoleConfig::default());

        let flusher = IntervalFlusher::spawn(handle.clone(), Duration::from_millis(10));
        handle.write(Channel::Info, "ticked out");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sink.len(), 1);
        assert_eq!(handle.buffered_entries(), 0);

        flusher.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_flushes_pending_entries() {
        let sink = Arc::new(MemorySink::new());
        let handle = ConsoleHandle::with_sink(sink.clone(), ConsoleConfig::default());

        // Long period: the tick will not fire during the test.
        let flusher = IntervalFlusher::spawn(handle.clone(), Duration::from_secs(3600));
        handle.write(Channel::Warn, "pending");

        flusher.shutdown().await;
        assert_eq!(sink.records(), vec![(Channel::Warn, "pending".to_string())]);
    }
}
