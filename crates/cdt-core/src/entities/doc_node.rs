use serde::{Deserialize, Serialize};

use crate::enums::DeclarationKind;

/// A comment attached to the declaration that immediately follows it.
///
/// Created whether or not the comment holds runnable examples; see
/// [`TestNode`](super::TestNode) for the filtered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocNode {
    /// Raw comment text, delimiters included.
    pub comment_spelling: String,
    /// Identifier plus role suffix, e.g. `Fac::class` or `fac`.
    pub text: String,
    /// `filename::scope::...::name`, the external selector for the node.
    pub path: String,
    pub kind: DeclarationKind,
    /// 1-based line of the declaration.
    pub line: usize,
}
