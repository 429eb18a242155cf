//! Transient entities produced by one parse/verify invocation.

mod doc_node;
mod test_case;
mod test_node;

pub use doc_node::DocNode;
pub use test_case::{TestCase, TestLine};
pub use test_node::{TestNode, Worklist};
