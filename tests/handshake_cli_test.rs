/*!
 * Handshake CLI Tests
 * End-to-end runs of the binary, which forks in a fresh process
 */

use fifo_handshake::core::limits::DEFAULT_PIPE_PATH;
use fifo_handshake::fifo::is_fifo;
use fifo_handshake::monitoring::TRACE_JSON_ENV;
use fifo_handshake::NamedPipe;
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_in(dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fifo-handshake"))
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .env_remove(TRACE_JSON_ENV)
        .output()
        .expect("failed to launch fifo-handshake")
}

#[test]
#[serial]
fn test_canonical_run_prints_message_and_cleans_up() {
    let dir = TempDir::new().unwrap();
    let output = run_in(dir.path());

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "Hijo recibió: Hola desde el proceso padre\n"
    );
    assert!(!dir.path().join(DEFAULT_PIPE_PATH).exists());
}

#[test]
#[serial]
fn test_sequential_runs_both_succeed() {
    let dir = TempDir::new().unwrap();

    for _ in 0..2 {
        let output = run_in(dir.path());
        assert_eq!(output.status.code(), Some(0));
        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "Hijo recibió: Hola desde el proceso padre\n"
        );
    }
    assert!(!dir.path().join(DEFAULT_PIPE_PATH).exists());
}

#[test]
#[serial]
fn test_stale_fifo_aborts_before_fork() {
    let dir = TempDir::new().unwrap();
    let stale = NamedPipe::create(dir.path().join(DEFAULT_PIPE_PATH), 0o666).unwrap();

    let output = run_in(dir.path());

    assert_eq!(output.status.code(), Some(1));
    // No consumer ever ran
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to create FIFO"), "stderr: {}", stderr);
    // The stale entry is not ours to remove
    assert!(stale.exists());
}

#[test]
#[serial]
fn test_regular_file_in_the_way_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(DEFAULT_PIPE_PATH);
    std::fs::write(&path, b"not a fifo").unwrap();

    let output = run_in(dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!is_fifo(&path));
    assert_eq!(std::fs::read(&path).unwrap(), b"not a fifo");
}
