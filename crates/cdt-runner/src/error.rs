//! Error types for cdt-runner.

use cdt_parser::ParserError;

/// Errors that abort a verification run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Artifact {artifact} not found (searched: {searched})")]
    ArtifactNotFound { artifact: String, searched: String },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Parser(#[from] ParserError),
}

/// Errors raised by an [`ExecutionBackend`](crate::ExecutionBackend).
///
/// Only [`Unavailable`](Self::Unavailable) is fatal for a run; the others
/// are recorded against the test line or case that hit them.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Execution backend '{binary}' could not be started: {source}")]
    Unavailable {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Seeding the case failed: {0}")]
    Seed(String),

    #[error("Statement failed: {0}")]
    Statement(String),

    #[error("Execution context terminated: {0}")]
    Terminated(String),

    #[error("Statement timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("Backend IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BackendError {
    /// The backend cannot run anything at all.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// The current case context is gone; further statements cannot see its
    /// bindings.
    #[must_use]
    pub const fn context_lost(&self) -> bool {
        matches!(self, Self::Terminated(_) | Self::Timeout { .. } | Self::Io(_))
    }
}
