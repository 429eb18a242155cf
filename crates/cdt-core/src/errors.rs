//! Cross-cutting error types for cdoctest.
//!
//! Domain-specific errors (`ParserError`, `RunnerError`, ...) live in their
//! respective crates. They converge into `anyhow` at the CLI boundary.

use thiserror::Error;

/// Errors that can be raised by any cdoctest crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A policy or kind name did not match any known variant.
    #[error("Unknown {kind} '{value}' (expected one of: {expected})")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}
