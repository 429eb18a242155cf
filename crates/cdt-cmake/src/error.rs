//! CMake introspection error types.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CmakeError {
    #[error("No CMake file-API reply under {0} (run cmake after write_query)")]
    ReplyNotFound(PathBuf),

    #[error("Target '{0}' not found in the CMake code model")]
    TargetNotFound(String),

    #[error("Configuration '{0}' not found in the CMake code model")]
    ConfigurationNotFound(String),

    #[error("Invalid CMake reply {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
