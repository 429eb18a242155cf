use serde::{Deserialize, Serialize};

use super::{DocNode, TestCase};

/// A [`DocNode`] whose comment holds at least one runnable statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestNode {
    pub doc: DocNode,
    pub case: TestCase,
}

/// The ordered list of test nodes handed to the verification engine.
pub type Worklist = Vec<TestNode>;

impl TestNode {
    /// Pair a doc node with its test case. Returns `None` for an empty case.
    #[must_use]
    pub fn new(doc: DocNode, case: TestCase) -> Option<Self> {
        if case.is_empty() {
            None
        } else {
            Some(Self { doc, case })
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.doc.path
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.doc.text
    }

    #[must_use]
    pub const fn is_pass(&self) -> Option<bool> {
        self.case.is_pass
    }
}
