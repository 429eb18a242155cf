//! # cdt-core
//!
//! Core data model and error types for cdoctest.
//!
//! This crate provides the types shared by every other cdoctest crate:
//! - Declaration kinds and the policies that steer path resolution and
//!   execution (`enums`)
//! - The transient entities produced by one parse/verify invocation:
//!   `DocNode`, `TestLine`, `TestCase`, `TestNode` (`entities`)
//! - Cross-cutting error types (`errors`)

pub mod entities;
pub mod enums;
pub mod errors;

pub use entities::{DocNode, TestCase, TestLine, TestNode, Worklist};
pub use enums::{DeclarationKind, FailurePolicy, ScopePolicy};
pub use errors::CoreError;
