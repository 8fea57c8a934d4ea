//! Foreground execution of the debugger.

use crate::error::GdbError;
use crate::interrupt::InterruptGuard;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Spawns GDB with inherited stdio and waits for it to exit.
///
/// Terminal interrupts are suppressed for the orchestrating process while the
/// debugger runs.
///
/// # Errors
/// Returns a [`GdbError`] if the interrupt handler cannot be registered, the
/// process cannot be spawned or waited on, or it exits with a non-zero
/// status.
pub async fn run_gdb(
    path: &Path,
    session_files: &[PathBuf],
    executable: &Path,
) -> Result<(), GdbError> {
    let args = crate::cmd::build_args(session_files, executable);
    debug!(gdb = %path.display(), ?args, "launching debugger");

    let _interrupts =
        InterruptGuard::install("gdb").map_err(|e| GdbError::SpawnFailed {
            stage: "interrupt handler".to_string(),
            source: e,
        })?;

    let mut child = Command::new(path)
        .args(&args)
        .spawn()
        .map_err(|e| GdbError::SpawnFailed {
            stage: "spawn".to_string(),
            source: e,
        })?;

    let status = child.wait().await.map_err(|e| GdbError::SpawnFailed {
        stage: "wait".to_string(),
        source: e,
    })?;

    if status.success() {
        info!("debugger exited");
        Ok(())
    } else {
        Err(GdbError::NonZeroExit {
            exit_code: status.code().unwrap_or(-1),
        })
    }
}
