use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Local TCP port the GDB server listens on for the foreground client.
pub const DEFAULT_GDB_PORT: u16 = 3333;

/// Settings for a probe-backed session and its GDB server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port the GDB server listens on.
    pub port: u16,
    /// Longest single wait for a handshake signal before the session
    /// re-checks the worker.
    pub poll_interval: Duration,
    /// How long the worker waits on its server between stop-request checks.
    pub liveness_interval: Duration,
    /// Upper bound on listing attached probes.
    pub discovery_timeout: Duration,
    /// Upper bound on the server reporting that it is listening.
    pub startup_timeout: Duration,
    /// Time the server gets to exit after `SIGTERM` before it is killed.
    pub shutdown_grace: Duration,
    /// Halt on hard faults.
    pub break_at_hardfault: bool,
    /// Step into interrupt handlers when single-stepping.
    pub step_into_interrupt: bool,
    /// Halt when the target resets.
    pub break_on_reset: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_GDB_PORT,
            poll_interval: Duration::from_secs(1),
            liveness_interval: Duration::from_millis(500),
            discovery_timeout: Duration::from_secs(5),
            startup_timeout: Duration::from_secs(15),
            shutdown_grace: Duration::from_secs(5),
            break_at_hardfault: true,
            step_into_interrupt: false,
            break_on_reset: false,
        }
    }
}

/// An attached debug probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probe {
    /// Probe serial number, used to pick it when several are attached.
    pub unique_id: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Target the probe reports being connected to, if any.
    #[serde(default)]
    pub target: Option<String>,
}
