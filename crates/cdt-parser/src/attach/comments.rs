//! Preceding-comment lookup among a node's siblings.

use ast_grep_core::Node;

use crate::parser::is_specifier_error;

/// The comment that documents `siblings[idx]`, spelled with its delimiters.
///
/// A block comment attaches alone. A run of `//` comments on consecutive
/// lines is joined with `\n` into one logical comment. A comment that shares
/// its line with a preceding named node (a trailing comment) never attaches,
/// and neither does one separated from the declaration by any other token
/// except a lone macro specifier.
pub(super) fn preceding_comment<D: ast_grep_core::Doc>(siblings: &[Node<D>], idx: usize) -> Option<String> {
    let mut prev_idx = idx.checked_sub(1)?;
    while is_specifier_error(&siblings[prev_idx]) {
        prev_idx = prev_idx.checked_sub(1)?;
    }
    let prev = &siblings[prev_idx];
    if !is_comment(prev) || is_trailing(siblings, prev_idx) {
        return None;
    }

    let text = prev.text().to_string();
    if !is_line_comment(&text) {
        return Some(text);
    }

    let mut lines = vec![text];
    let mut first = prev_idx;
    while let Some(candidate) = first.checked_sub(1) {
        let node = &siblings[candidate];
        if !is_comment(node)
            || !is_line_comment(&node.text())
            || node.end_pos().line() + 1 != siblings[first].start_pos().line()
            || is_trailing(siblings, candidate)
        {
            break;
        }
        lines.push(node.text().to_string());
        first = candidate;
    }
    lines.reverse();
    Some(lines.join("\n"))
}

fn is_comment<D: ast_grep_core::Doc>(node: &Node<D>) -> bool {
    node.kind().as_ref() == "comment"
}

fn is_line_comment(text: &str) -> bool {
    text.starts_with("//")
}

fn is_trailing<D: ast_grep_core::Doc>(siblings: &[Node<D>], comment_idx: usize) -> bool {
    let Some(before) = comment_idx.checked_sub(1).map(|i| &siblings[i]) else {
        return false;
    };
    // Preprocessor lines own their terminating newline, so they end on the
    // comment's line without sharing it.
    before.is_named()
        && !is_comment(before)
        && !before.text().ends_with('\n')
        && before.end_pos().line() == siblings[comment_idx].start_pos().line()
}
