use thiserror::Error;

#[derive(Debug, Error)]
pub enum UvisionError {
    #[error("uVision executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("Exactly one .uvproj or .uvprojx project file must be provided, found {0}")]
    ProjectFileCount(usize),

    #[error("Failed to spawn process at stage '{stage}': {source}")]
    SpawnFailed {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[error("uVision exited with non-zero status: {exit_code}")]
    NonZeroExit { exit_code: i32 },
}
