//! End-to-end tests for the buffered console.

use lunos_console::{Channel, ConsoleConfig, ConsoleHandle, IntervalFlusher, MemorySink};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn sequence_of_writes_flushes_once_in_call_order() {
    let sink = Arc::new(MemorySink::new());
    let console = ConsoleHandle::with_sink(sink.clone(), ConsoleConfig::default());

    for i in 0..20 {
        let channel = match i % 3 {
            0 => Channel::Info,
            1 => Channel::Warn,
            _ => Channel::Error,
        };
        console.write(channel, format!("entry {i}"));
    }
    assert!(sink.is_empty());

    assert_eq!(console.flush(), 20);
    let texts = sink.texts();
    assert_eq!(texts.len(), 20);
    for (i, text) in texts.iter().enumerate() {
        assert_eq!(text, &format!("entry {i}"));
    }
}

#[test]
fn host_shutdown_without_explicit_flush_loses_nothing() {
    let sink = Arc::new(MemorySink::new());
    {
        let console = ConsoleHandle::with_sink(sink.clone(), ConsoleConfig::default());
        let worker = console.clone();
        for i in 0..7 {
            worker.write(Channel::Info, format!("unflushed {i}"));
        }
        // Both handles drop here; the buffer's teardown flush runs.
    }
    assert_eq!(sink.len(), 7);
    assert_eq!(sink.texts()[0], "unflushed 0");
    assert_eq!(sink.texts()[6], "unflushed 6");
}

#[test]
fn warn_then_error_arrive_on_their_channels_in_order() {
    let sink = Arc::new(MemorySink::new());
    let console = ConsoleHandle::with_sink(sink.clone(), ConsoleConfig::default());

    console.write(Channel::Warn, "x");
    console.write(Channel::Error, "y");
    console.flush();

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0], (Channel::Warn, "x".to_string()));
    assert!(!records[0].0.is_error());
    assert_eq!(records[1], (Channel::Error, "y".to_string()));
    assert!(records[1].0.is_error());
}

#[tokio::test]
async fn interval_flusher_composes_with_manual_flush() {
    let sink = Arc::new(MemorySink::new());
    let console = ConsoleHandle::with_sink(sink.clone(), ConsoleConfig::default());
    let flusher = IntervalFlusher::spawn(console.clone(), Duration::from_secs(3600));

    console.write(Channel::Info, "manual");
    console.flush();
    assert_eq!(sink.len(), 1);

    console.write(Channel::Info, "at shutdown");
    flusher.shutdown().await;
    assert_eq!(sink.len(), 2);
}
