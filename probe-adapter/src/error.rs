use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("pyOCD executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("Failed to spawn process at stage '{stage}': {source}")]
    SpawnFailed {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {elapsed:?} at stage '{stage}'")]
    Timeout {
        stage: String,
        elapsed: std::time::Duration,
    },

    #[error("Listing debug probes failed: {0}")]
    ProbeListFailed(String),

    #[error("Failed to parse probe list: {0}")]
    ProbeListParse(#[from] serde_json::Error),

    #[error("No debug probe is attached")]
    NoProbeAttached,

    #[error("GDB server exited before it was ready (exit code: {exit_code:?})")]
    ServerExited { exit_code: Option<i32> },

    #[error("Failed to send signal {signal} to PID {pid}: {reason}")]
    SignalFailed {
        signal: String,
        pid: u32,
        reason: String,
    },

    #[error("Child process stderr was not captured")]
    NoStderr,

    #[error("Could not get PID from child process")]
    NoPid,

    #[error("GDB server worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("GDB server failed to start: {reason}")]
    ServerStartFailed { reason: String },

    #[error("Debug session cancelled")]
    Cancelled,
}
