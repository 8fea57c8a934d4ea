use crate::errors::LaunchError;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use valinor_gdb::GdbCli;
use valinor_probe::{run_session, CancelToken, ProbeServer, ServerConfig};
use valinor_uvision::UvisionCli;

/// Settings shared by every launcher built during a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchSettings {
    /// GDB server settings for probe-backed sessions.
    pub server: ServerConfig,
    /// Explicit `pyocd` location.
    pub pyocd: Option<PathBuf>,
}

/// Opens a debug session on generated files.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Runs the session to completion.
    ///
    /// `session_files` are the generated files, in generation order.
    /// `cancel` only interrupts the phases valinor itself waits on; once a
    /// foreground debugger runs, interrupts belong to it.
    async fn run(
        &self,
        session_files: &[PathBuf],
        executable: &Path,
        cancel: &CancelToken,
    ) -> Result<(), LaunchError>;
}

/// A launcher bound to a discovered executable.
pub enum ToolLauncher {
    /// Plain `gdb` in the foreground.
    Gdb(GdbCli),
    /// `arm-none-eabi-gdb` with a probe GDB server in the background.
    ProbeGdb {
        /// The foreground debugger.
        gdb: GdbCli,
        /// Server started before, and stopped after, the debugger.
        server: Arc<dyn ProbeServer>,
        /// Session settings.
        config: ServerConfig,
    },
    /// uVision on the generated project.
    Uvision(UvisionCli),
}

impl fmt::Debug for ToolLauncher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gdb(gdb) => f.debug_tuple("Gdb").field(&gdb.path).finish(),
            Self::ProbeGdb { gdb, config, .. } => f
                .debug_struct("ProbeGdb")
                .field("gdb", &gdb.path)
                .field("port", &config.port)
                .finish_non_exhaustive(),
            Self::Uvision(uvision) => f.debug_tuple("Uvision").field(&uvision.path).finish(),
        }
    }
}

#[async_trait]
impl Launcher for ToolLauncher {
    async fn run(
        &self,
        session_files: &[PathBuf],
        executable: &Path,
        cancel: &CancelToken,
    ) -> Result<(), LaunchError> {
        match self {
            Self::Gdb(gdb) => {
                info!(gdb = %gdb.path.display(), "starting debugger");
                gdb.run(session_files, executable).await?;
            }
            Self::ProbeGdb {
                gdb,
                server,
                config,
            } => {
                info!(gdb = %gdb.path.display(), port = config.port, "starting probe-backed debugger");
                let client = run_session(Arc::clone(server), config, cancel, || {
                    gdb.run(session_files, executable)
                })
                .await?;
                client?;
            }
            Self::Uvision(uvision) => {
                info!(uvision = %uvision.path.display(), "opening uVision");
                uvision.run(session_files).await?;
            }
        }
        Ok(())
    }
}
