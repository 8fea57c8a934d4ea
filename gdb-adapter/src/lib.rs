//! Rust adapter for driving GDB as an interactive foreground debugger.
//!
//! This crate provides discovery of the generic `gdb` and the
//! `arm-none-eabi-gdb` executables, command-line construction from session
//! command files, and a launcher that runs the debugger to completion while
//! keeping terminal interrupts away from the orchestrating process.

/// Command-line argument construction for GDB invocations.
pub mod cmd;
/// Discovery and resolution of GDB executable paths.
pub mod discovery;
/// Error types returned by adapter operations.
pub mod error;
/// Suppression of terminal interrupts while a foreground child runs.
pub mod interrupt;
/// Foreground subprocess execution.
pub mod process;

pub use discovery::{
    discover_arm_none_eabi_gdb, discover_gdb, ARM_GDB_BIN_ENV_VAR, GDB_BIN_ENV_VAR,
};
pub use error::GdbError;
pub use interrupt::InterruptGuard;
pub use process::run_gdb;

use std::path::{Path, PathBuf};

/// High-level handle on a discovered GDB executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdbCli {
    /// Filesystem path to the debugger executable.
    pub path: PathBuf,
}

impl GdbCli {
    /// Creates a new `GdbCli` from a resolved executable path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Runs the debugger against `executable`, sourcing `session_files` in
    /// order, and waits for the user to quit it.
    ///
    /// # Errors
    ///
    /// Returns `GdbError` if the debugger cannot be spawned or exits with a
    /// non-zero status.
    pub async fn run(&self, session_files: &[PathBuf], executable: &Path) -> Result<(), GdbError> {
        run_gdb(&self.path, session_files, executable).await
    }
}
