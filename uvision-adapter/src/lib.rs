#![warn(clippy::pedantic)]
pub mod discovery;
pub mod error;
pub mod process;

pub use discovery::{discover_uvision, UVISION_BIN_ENV_VAR};
pub use error::UvisionError;
pub use process::{run_uvision, select_project_file};

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UvisionCli {
    pub path: PathBuf,
}

impl UvisionCli {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Opens the single uVision project found in `project_files` and waits
    /// for the IDE to close.
    ///
    /// # Errors
    /// Returns an error if the file list does not hold exactly one project,
    /// or if the IDE cannot be started or exits unsuccessfully.
    pub async fn run(&self, project_files: &[PathBuf]) -> Result<(), UvisionError> {
        run_uvision(&self.path, project_files).await
    }
}
