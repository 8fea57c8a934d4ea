use crate::tool::Tool;
use std::path::PathBuf;
use thiserror::Error;
use valinor_gdb::GdbError;
use valinor_probe::ProbeError;
use valinor_project::ProjectError;
use valinor_uvision::UvisionError;

/// Errors of a valinor run.
#[derive(Debug, Error)]
pub enum Error {
    /// The executable to debug does not exist.
    #[error("cannot debug file \"{}\" that does not exist", .0.display())]
    ExecutableMissing(PathBuf),

    /// The generator succeeded but produced nothing.
    #[error("no debug files were generated for {tool}")]
    NoProjectFiles {
        /// Tool the files were generated for.
        tool: String,
    },

    /// No detected tool can debug the target.
    #[error("no available debug tool supports target {target}")]
    NoToolSelected {
        /// The requested target.
        target: String,
    },

    /// The selected tool is not installed.
    #[error("{0} was not found on this system")]
    ToolNotFound(Tool),

    /// A tool id the generator accepted but valinor cannot launch. Only
    /// raised at launch time, once the files exist.
    #[error(transparent)]
    UnknownTool(#[from] crate::tool::UnknownTool),

    /// Project generation failed.
    #[error("Project generation error: {0}")]
    Project(#[from] ProjectError),

    /// The debug session failed after the files were generated.
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    /// The configuration could not be loaded.
    #[error("Configuration error: {0:#}")]
    Config(#[from] anyhow::Error),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Failures before any file is generated exit with 1. Failing to open
    /// the session afterwards exits with 2, and a cancelled session with
    /// 130.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Launch(e) if e.is_cancelled() => 130,
            Self::Launch(_) | Self::ToolNotFound(_) | Self::UnknownTool(_) => 2,
            _ => 1,
        }
    }
}

/// Errors from running a launcher.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The debugger failed.
    #[error("gdb: {0}")]
    Gdb(#[from] GdbError),

    /// uVision failed.
    #[error("uVision: {0}")]
    Uvision(#[from] UvisionError),

    /// The probe session failed.
    #[error("probe session: {0}")]
    Probe(#[from] ProbeError),
}

impl LaunchError {
    /// Whether the session was cancelled rather than failing.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Probe(ProbeError::Cancelled))
    }
}
