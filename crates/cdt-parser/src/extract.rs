//! Test-case extraction from doc comments.
//!
//! A comment body is scanned line by line with a two-state machine:
//!
//! ```text
//! Seeking ──marker──▶ Collecting ──marker──▶ Collecting (new line)
//!    │                    │
//!  other: doc text     blank: skipped, other: expected output
//! ```
//!
//! A `...` line directly after a statement, before any output, continues
//! that statement on a new line.

use cdt_core::{DocNode, TestCase, TestLine, TestNode};

/// Default prefix of a statement line.
pub const PROMPT_MARKER: &str = ">>>";

/// Prefix of a line continuing the previous statement.
pub const CONTINUATION_MARKER: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingMarker,
    CollectingOutput,
}

/// Extract the test case of a doc node with the default marker.
#[must_use]
pub fn extract(doc: &DocNode) -> TestCase {
    extract_with_marker(&doc.comment_spelling, PROMPT_MARKER)
}

/// Extract a test case from a raw comment spelling.
///
/// Each marker line opens a [`TestLine`] whose `cmd` is the rest of the line;
/// the non-blank lines that follow, up to the next marker or the end of the
/// comment, are its expected outputs. Text before the first marker is plain
/// documentation.
#[must_use]
pub fn extract_with_marker(comment_spelling: &str, marker: &str) -> TestCase {
    let mut state = ScanState::SeekingMarker;
    let mut lines: Vec<TestLine> = Vec::new();

    for body_line in comment_body(comment_spelling) {
        if let Some(cmd) = body_line.strip_prefix(marker) {
            lines.push(TestLine::new(cmd.trim(), Vec::new()));
            state = ScanState::CollectingOutput;
            continue;
        }
        match state {
            ScanState::SeekingMarker => {}
            ScanState::CollectingOutput => {
                if body_line.is_empty() {
                    continue;
                }
                let Some(current) = lines.last_mut() else {
                    continue;
                };
                match body_line.strip_prefix(CONTINUATION_MARKER) {
                    Some(rest) if current.outputs.is_empty() => {
                        current.cmd.push('\n');
                        current.cmd.push_str(rest.trim());
                    }
                    _ => current.outputs.push(body_line.to_string()),
                }
            }
        }
    }

    TestCase::new(lines)
}

/// Keep the doc nodes that carry at least one test line, in order.
#[must_use]
pub fn filter_tests(docs: impl IntoIterator<Item = DocNode>) -> Vec<TestNode> {
    filter_tests_with_marker(docs, PROMPT_MARKER)
}

/// [`filter_tests`] with a custom marker.
#[must_use]
pub fn filter_tests_with_marker(docs: impl IntoIterator<Item = DocNode>, marker: &str) -> Vec<TestNode> {
    docs.into_iter()
        .filter_map(|doc| {
            let case = extract_with_marker(&doc.comment_spelling, marker);
            TestNode::new(doc, case)
        })
        .collect()
}

/// Comment text without delimiters or decoration, one trimmed entry per line.
fn comment_body(spelling: &str) -> Vec<&str> {
    let spelling = spelling.trim();
    if let Some(inner) = block_inner(spelling) {
        inner
            .lines()
            .map(|line| strip_decoration(line.trim()))
            .collect()
    } else {
        spelling
            .lines()
            .map(|line| strip_line_comment(line.trim()).trim())
            .collect()
    }
}

fn block_inner(spelling: &str) -> Option<&str> {
    let rest = spelling
        .strip_prefix("/**")
        .or_else(|| spelling.strip_prefix("/*!"))
        .or_else(|| spelling.strip_prefix("/*"))?;
    Some(rest.strip_suffix("*/").unwrap_or(rest))
}

fn strip_decoration(line: &str) -> &str {
    if line == "*" {
        return "";
    }
    line.strip_prefix("* ").map_or(line, str::trim_start)
}

fn strip_line_comment(line: &str) -> &str {
    line.strip_prefix("///")
        .or_else(|| line.strip_prefix("//!"))
        .or_else(|| line.strip_prefix("//"))
        .unwrap_or(line)
}
