//! End-to-end executor scenarios.

use lunos_exec::{CommandSpec, ErrorKind, Executor};
use std::time::Duration;

#[tokio::test]
async fn shell_echo_returns_stdout_with_newline() {
    let executor = Executor::default();
    let out = executor
        .run(&CommandSpec::shell_with("sh", "echo Hello, world!"))
        .await
        .unwrap();
    assert_eq!(out.output, "Hello, world!\n");
}

#[tokio::test]
async fn shell_exit_one_is_a_non_zero_exit_error() {
    let executor = Executor::default();
    let err = executor
        .run(&CommandSpec::shell_with("sh", "exit 1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NonZeroExit);
    assert_eq!(err.exit_code(), Some(1));
}

#[tokio::test]
async fn nonexistent_command_is_a_spawn_failure() {
    let executor = Executor::default();
    let err = executor
        .run(&CommandSpec::direct("lunos-no-such-binary-xyz"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SpawnFailed);
}

#[tokio::test]
async fn hung_process_with_timeout_is_killed() {
    let executor = Executor::default();
    let started = std::time::Instant::now();
    let err = executor
        .run(
            &CommandSpec::shell("sleep 60")
                .timeout(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    // The call returned promptly rather than waiting out the sleep.
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn large_output_does_not_deadlock() {
    // Well past typical pipe capacity; passes only because the streams
    // are drained concurrently with the child's execution.
    let executor = Executor::default();
    let out = executor
        .run(&CommandSpec::shell(
            "i=0; while [ $i -lt 20000 ]; do echo 'a line of filler output'; i=$((i+1)); done",
        ))
        .await
        .unwrap();
    assert_eq!(out.output.lines().count(), 20000);
}
