//! Launch tests using a stand-in debugger script.
//!
//! The script records its arguments so the tests can check exactly what a
//! real GDB would have been given.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use valinor_gdb::{GdbCli, GdbError};

/// Writes an executable shell script that logs its arguments, one per line,
/// then exits with `exit_code`.
fn fake_debugger(dir: &Path, exit_code: i32) -> PathBuf {
    let script = dir.join("fake-gdb");
    let log = dir.join("args.log");
    let body = format!(
        "#!/bin/sh\nfor arg in \"$@\"; do echo \"$arg\" >> '{}'; done\nexit {exit_code}\n",
        log.display()
    );
    std::fs::write(&script, body).expect("write script");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
    script
}

#[tokio::test]
async fn test_debugger_receives_session_files_then_executable() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gdb = GdbCli::new(fake_debugger(dir.path(), 0));

    let files = vec![dir.path().join("first.gdb"), dir.path().join("second.gdb")];
    let exe = dir.path().join("app.elf");

    gdb.run(&files, &exe).await.expect("debugger should succeed");

    let logged = std::fs::read_to_string(dir.path().join("args.log")).expect("read log");
    let lines: Vec<&str> = logged.lines().collect();
    let expected = vec![
        "-x".to_string(),
        files[0].display().to_string(),
        "-x".to_string(),
        files[1].display().to_string(),
        exe.display().to_string(),
    ];
    assert_eq!(lines, expected);
}

#[tokio::test]
async fn test_non_zero_exit_is_reported() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gdb = GdbCli::new(fake_debugger(dir.path(), 3));

    let err = gdb
        .run(&[], &dir.path().join("app.elf"))
        .await
        .unwrap_err();

    assert!(
        matches!(err, GdbError::NonZeroExit { exit_code: 3 }),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn test_missing_binary_fails_to_spawn() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let gdb = GdbCli::new(dir.path().join("no-such-gdb"));

    let err = gdb.run(&[], Path::new("app.elf")).await.unwrap_err();
    assert!(matches!(err, GdbError::SpawnFailed { ref stage, .. } if stage == "spawn"));
}

#[tokio::test]
async fn test_interrupt_while_debugger_runs_is_ignored() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let script = dir.path().join("slow-gdb");
    std::fs::write(&script, "#!/bin/sh\nsleep 0.3\nexit 0\n").expect("write script");
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
    let gdb = GdbCli::new(script);
    let exe = dir.path().join("app.elf");

    let interrupt = async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        tokio::process::Command::new("kill")
            .args(["-INT", &std::process::id().to_string()])
            .status()
            .await
            .expect("run kill")
    };
    let (result, kill_status) = tokio::join!(gdb.run(&[], &exe), interrupt);

    assert!(kill_status.success());
    assert!(result.is_ok(), "unexpected error: {result:?}");
}
