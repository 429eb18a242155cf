//! The execution backend seam.

use std::path::PathBuf;

use crate::error::BackendError;

/// What a fresh case context is seeded with before its first statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSeed {
    /// Resolved shared library to load.
    pub library: PathBuf,
    /// Directories added to the include path.
    pub include_dirs: Vec<PathBuf>,
    /// Header included after the library is loaded, when one was found.
    pub header: Option<PathBuf>,
}

/// A stateful C++ evaluator.
///
/// Statements executed between [`open_case`](Self::open_case) and
/// [`close_case`](Self::close_case) share one context: a declaration made by
/// one statement is visible to the next. Contexts never leak between cases.
pub trait ExecutionBackend {
    /// Start a fresh context and seed it.
    ///
    /// # Errors
    ///
    /// [`BackendError::Unavailable`] when the backend cannot be started at
    /// all, [`BackendError::Seed`] when the library or header is rejected.
    fn open_case(&mut self, seed: &CaseSeed) -> Result<(), BackendError>;

    /// Compile and run one statement, returning the lines it printed to
    /// standard output. A final line without a newline is still a line; an
    /// empty line printed last is kept.
    ///
    /// # Errors
    ///
    /// [`BackendError::Statement`] for compile or runtime errors; the
    /// context survives. [`BackendError::Terminated`],
    /// [`BackendError::Timeout`] and [`BackendError::Io`] mean it did not.
    fn execute(&mut self, statement: &str) -> Result<Vec<String>, BackendError>;

    /// Tear down the current context, if any.
    fn close_case(&mut self);

    /// Release every resource held by the backend.
    fn shutdown(&mut self) {
        self.close_case();
    }
}
