use crate::error::ProjectError;
use crate::targets::core_for;
use crate::types::{GeneratedProject, ProjectData};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Generates debug files for one tool.
pub trait Exporter: Send + Sync {
    /// Writes the tool's files for `data`.
    fn generate(&self, data: &ProjectData) -> Result<GeneratedProject, ProjectError>;

    /// Adjusts the executable so the tool accepts it. Must be idempotent.
    fn fixup_executable(&self, executable: &Path) -> Result<PathBuf, ProjectError> {
        Ok(executable.to_path_buf())
    }

    /// Whether the tool can debug `target` out of the box.
    fn supports_target(&self, target: &str) -> bool;
}

/// Which boards a [`GdbStartupExporter`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boards {
    Any,
    KnownCortexM,
}

/// Writes a GDB command file, `<name>.gdbstartup`, that connects to the
/// probe's GDB server and flashes the executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GdbStartupExporter {
    port: u16,
    boards: Boards,
}

/// Extension of generated GDB command files.
pub const STARTUP_EXTENSION: &str = "gdbstartup";

impl GdbStartupExporter {
    /// Exporter for a host `gdb`; accepts any board.
    #[must_use]
    pub const fn generic(port: u16) -> Self {
        Self {
            port,
            boards: Boards::Any,
        }
    }

    /// Exporter for `arm-none-eabi-gdb`; accepts boards with a known
    /// Cortex-M core.
    #[must_use]
    pub const fn arm_none_eabi(port: u16) -> Self {
        Self {
            port,
            boards: Boards::KnownCortexM,
        }
    }

    fn startup_script(&self, data: &ProjectData) -> String {
        let mut script = format!("# {}: debug session for {}", data.name, data.target);
        if !data.core.is_empty() {
            script.push_str(&format!(" ({})", data.core));
        }
        script.push('\n');
        script.push_str(&format!("target remote localhost:{}\n", self.port));
        script.push_str("monitor reset halt\n");
        script.push_str("load\n");
        script.push_str("monitor reset halt\n");
        script
    }
}

impl Exporter for GdbStartupExporter {
    fn generate(&self, data: &ProjectData) -> Result<GeneratedProject, ProjectError> {
        std::fs::create_dir_all(&data.output_dir).map_err(|source| ProjectError::Io {
            path: data.output_dir.clone(),
            source,
        })?;

        let file = data
            .output_dir
            .join(format!("{}.{STARTUP_EXTENSION}", data.name));
        std::fs::write(&file, self.startup_script(data)).map_err(|source| ProjectError::Io {
            path: file.clone(),
            source,
        })?;
        debug!(file = %file.display(), "wrote gdb startup file");

        Ok(GeneratedProject {
            path: data.output_dir.clone(),
            files: vec![file],
        })
    }

    /// GDB may run from another directory than the caller, so the
    /// executable is handed over as a canonical absolute path.
    fn fixup_executable(&self, executable: &Path) -> Result<PathBuf, ProjectError> {
        std::fs::canonicalize(executable).map_err(|source| ProjectError::Io {
            path: executable.to_path_buf(),
            source,
        })
    }

    fn supports_target(&self, target: &str) -> bool {
        match self.boards {
            Boards::Any => true,
            Boards::KnownCortexM => core_for(target).is_some(),
        }
    }
}
