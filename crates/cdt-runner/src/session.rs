//! Per-invocation context shared by the pipeline stages.

use cdt_core::{DocNode, TestNode};
use cdt_parser::{ParseOptions, SourceParser};

use crate::backend::ExecutionBackend;
use crate::clang_repl::{ClangRepl, ClangReplOptions};
use crate::error::{BackendError, RunnerError};

type BackendFactory = Box<dyn FnMut() -> Result<Box<dyn ExecutionBackend>, BackendError>>;

/// Owns the source parser and the execution backend for one invocation.
///
/// Both are created on first use. The backend is shut down by
/// [`shutdown`](Self::shutdown) or when the session is dropped.
pub struct Session {
    parse_options: ParseOptions,
    parser: Option<SourceParser>,
    factory: BackendFactory,
    backend: Option<Box<dyn ExecutionBackend>>,
}

impl Session {
    pub fn new(
        parse_options: ParseOptions,
        factory: impl FnMut() -> Result<Box<dyn ExecutionBackend>, BackendError> + 'static,
    ) -> Self {
        Self {
            parse_options,
            parser: None,
            factory: Box::new(factory),
            backend: None,
        }
    }

    /// Session backed by `clang-repl`.
    #[must_use]
    pub fn with_clang_repl(parse_options: ParseOptions, repl: ClangReplOptions) -> Self {
        Self::new(parse_options, move || {
            Ok(Box::new(ClangRepl::new(repl.clone())) as Box<dyn ExecutionBackend>)
        })
    }

    pub fn parser(&mut self) -> &SourceParser {
        self.parser
            .get_or_insert_with(|| SourceParser::new(self.parse_options.clone()))
    }

    /// The backend, started on first call.
    ///
    /// # Errors
    ///
    /// Whatever the factory reports when the backend cannot be created.
    pub fn backend(&mut self) -> Result<&mut (dyn ExecutionBackend + 'static), RunnerError> {
        let backend = match self.backend.take() {
            Some(backend) => backend,
            None => {
                tracing::debug!("starting execution backend");
                (self.factory)()?
            }
        };
        Ok(&mut **self.backend.insert(backend))
    }

    /// # Errors
    ///
    /// As [`SourceParser::attach`].
    pub fn attach(&mut self, source: &str, filename: Option<&str>) -> Result<Vec<DocNode>, RunnerError> {
        Ok(self.parser().attach(source, filename)?)
    }

    /// # Errors
    ///
    /// As [`SourceParser::test_nodes`].
    pub fn test_nodes(&mut self, source: &str, filename: Option<&str>) -> Result<Vec<TestNode>, RunnerError> {
        Ok(self.parser().test_nodes(source, filename)?)
    }

    /// Release the backend. The session can start a new one afterwards.
    pub fn shutdown(&mut self) {
        if let Some(mut backend) = self.backend.take() {
            tracing::debug!("shutting down execution backend");
            backend.shutdown();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("parse_options", &self.parse_options)
            .field("parser_ready", &self.parser.is_some())
            .field("backend_ready", &self.backend.is_some())
            .finish_non_exhaustive()
    }
}
