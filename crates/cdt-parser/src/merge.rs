//! Worklist assembly for an implementation/header pair.

use cdt_core::{TestNode, Worklist};

use crate::attach::SourceParser;
use crate::error::ParserError;

/// One source file handed to [`merge_sources`].
#[derive(Debug, Clone, Copy)]
pub struct SourceInput<'a> {
    pub text: &'a str,
    pub filename: Option<&'a str>,
}

impl<'a> SourceInput<'a> {
    #[must_use]
    pub const fn new(text: &'a str, filename: Option<&'a str>) -> Self {
        Self { text, filename }
    }
}

/// Concatenate two test-node lists, `first` then `second`.
///
/// Nodes with identical paths are kept side by side; nothing is deduplicated
/// or reconciled.
#[must_use]
pub fn merge(first: Vec<TestNode>, second: Vec<TestNode>) -> Worklist {
    let mut worklist = first;
    worklist.extend(second);
    worklist
}

/// Attach, filter and merge a translation unit with its header. The
/// translation unit's tests run first.
///
/// # Errors
///
/// Whatever [`SourceParser::attach`] reports for either input.
pub fn merge_sources(
    parser: &SourceParser,
    translation_unit: SourceInput<'_>,
    header: SourceInput<'_>,
) -> Result<Worklist, ParserError> {
    let tu_nodes = parser.test_nodes(translation_unit.text, translation_unit.filename)?;
    let header_nodes = parser.test_nodes(header.text, header.filename)?;
    tracing::debug!(
        translation_unit = tu_nodes.len(),
        header = header_nodes.len(),
        "merged worklists"
    );
    Ok(merge(tu_nodes, header_nodes))
}
