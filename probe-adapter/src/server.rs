use crate::discovery::{choose_probe, discover_pyocd, list_probes};
use crate::error::ProbeError;
use crate::types::{Probe, ServerConfig};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Something that can find a debug probe and serve GDB for it.
#[async_trait]
pub trait ProbeServer: Send + Sync {
    /// Finds an attached probe. Must not block indefinitely when nothing is
    /// attached; that case is `ProbeError::NoProbeAttached`.
    async fn find_probe(&self, config: &ServerConfig) -> Result<Probe, ProbeError>;

    /// Starts a GDB server for `probe` and returns once it is listening.
    async fn start(
        &self,
        probe: &Probe,
        config: &ServerConfig,
    ) -> Result<Box<dyn RunningServer>, ProbeError>;
}

/// A started GDB server.
#[async_trait]
pub trait RunningServer: Send {
    /// Whether the server is still running.
    fn is_alive(&mut self) -> bool;

    /// Waits up to `limit` for the server to exit on its own.
    async fn join(&mut self, limit: Duration);

    /// Stops the server and waits for it to exit.
    async fn stop(&mut self) -> Result<(), ProbeError>;
}

/// GDB server provided by the `pyocd` command-line tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyOcdServer {
    /// Override for the `pyocd` location (None = auto-discover).
    pub explicit_path: Option<PathBuf>,
}

impl PyOcdServer {
    /// Server using `pyocd` from `explicit_path`, or discovered when `None`.
    #[must_use]
    pub const fn new(explicit_path: Option<PathBuf>) -> Self {
        Self { explicit_path }
    }
}

#[async_trait]
impl ProbeServer for PyOcdServer {
    async fn find_probe(&self, config: &ServerConfig) -> Result<Probe, ProbeError> {
        let pyocd = discover_pyocd(self.explicit_path.clone())?;
        let probes = list_probes(&pyocd, config.discovery_timeout).await?;
        choose_probe(probes)
    }

    async fn start(
        &self,
        probe: &Probe,
        config: &ServerConfig,
    ) -> Result<Box<dyn RunningServer>, ProbeError> {
        let pyocd = discover_pyocd(self.explicit_path.clone())?;
        let process = crate::process::spawn_gdbserver(&pyocd, probe, config).await?;
        Ok(Box::new(process))
    }
}
