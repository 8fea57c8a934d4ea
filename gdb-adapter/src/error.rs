use thiserror::Error;

#[derive(Debug, Error)]
pub enum GdbError {
    #[error("GDB executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("Failed to spawn process at stage '{stage}': {source}")]
    SpawnFailed {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    /// `exit_code` is -1 when the debugger was terminated by a signal.
    #[error("Debugger exited with non-zero status: {exit_code}")]
    NonZeroExit { exit_code: i32 },
}
