//! Public error types for project generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating debug projects.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The tool has no registered exporter.
    ///
    /// This is a configuration or programming error, not an environment
    /// condition.
    #[error("Exporter does not support tool '{0}'")]
    UnsupportedTool(String),

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A target definitions file could not be parsed.
    #[error("Invalid target definitions in {}: {source}", path.display())]
    Definitions {
        /// The definitions file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}
