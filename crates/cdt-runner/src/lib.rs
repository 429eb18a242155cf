//! # cdt-runner
//!
//! Execution and verification of extracted doctests.
//!
//! A [`Session`] owns the parser and a lazily started [`ExecutionBackend`];
//! [`verify`] walks a worklist, opens one fresh backend context per test
//! case and records per-line results on the worklist itself. The
//! [`RunReport`] summarises those results for rendering.

pub mod artifact;
pub mod backend;
pub mod clang_repl;
pub mod error;
pub mod report;
pub mod session;
pub mod verify;

pub use backend::{CaseSeed, ExecutionBackend};
pub use clang_repl::{ClangRepl, ClangReplOptions};
pub use error::{BackendError, RunnerError};
pub use report::{LineReport, NodeReport, RunReport, RunTotals, Status};
pub use session::Session;
pub use verify::{VerifyOutcome, VerifyRequest, split_output, verify};
