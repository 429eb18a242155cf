//! # cdt-parser
//!
//! ast-grep-based doctest discovery for C and C++ sources.
//!
//! The pipeline is split into four small stages:
//! - [`scope`]: pure `text`/`path` resolution for a declaration
//! - [`attach`]: comment-to-declaration attachment over the syntax tree
//! - [`extract`]: the `>>>` marker scanner that turns a comment into a test case
//! - [`merge`]: concatenation of the implementation and header worklists

pub mod attach;
pub mod error;
pub mod extract;
pub mod merge;
pub mod parser;
pub mod scope;

pub use attach::{ParseOptions, SourceParser};
pub use error::ParserError;
pub use extract::{CONTINUATION_MARKER, PROMPT_MARKER, extract, extract_with_marker, filter_tests, filter_tests_with_marker};
pub use merge::{SourceInput, merge, merge_sources};
pub use parser::{AstTree, detect_language, parse_source};
pub use scope::{DEFAULT_FILENAME, DeclName, resolve, split_qualified};
