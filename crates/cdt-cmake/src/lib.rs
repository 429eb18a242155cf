//! # cdt-cmake
//!
//! Minimal reader for the CMake file API (`codemodel-v2`).
//!
//! ```text
//! <build>/.cmake/api/v1/query/codemodel-v2          written by write_query
//! <build>/.cmake/api/v1/reply/index-<stamp>.json    written by cmake
//!            └── codemodel-v2-<hash>.json
//!                  └── target-<name>-<config>-<hash>.json
//! ```
//!
//! [`CmakeApi`] answers the questions a doctest run needs: which shared
//! library to load, which include directories to pass, and which
//! source/header files carry the tests.

mod api;
mod error;
mod pairing;
mod query;
mod reply;

pub use api::{CmakeApi, LinkedLibrary, TargetInfo, TargetKind};
pub use error::CmakeError;
pub use pairing::{SourcePair, pair_sources};
pub use query::{query_path, reply_dir, write_query};
