//! ast-grep wrapper and C/C++ language detection from file extensions.

use ast_grep_core::Node;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::SupportLang;

/// The concrete AST tree type returned by `parse_source`.
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// Detect the C-family language from a file path extension.
///
/// Headers are parsed with the C++ grammar, which accepts the C subset
/// doctests are written in. Returns `None` for anything else.
#[must_use]
pub fn detect_language(file_path: &str) -> Option<SupportLang> {
    let file_name = file_path.rsplit(['/', '\\']).next()?;
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext {
        "c" => Some(SupportLang::C),
        "h" | "hh" | "hpp" | "hxx" | "h++" | "inl" | "ipp" | "cpp" | "cc" | "cxx" | "c++" => {
            Some(SupportLang::Cpp)
        }
        _ => None,
    }
}

/// Parse source code into an ast-grep tree for the given language.
#[must_use]
pub fn parse_source(source: &str, lang: SupportLang) -> AstTree {
    use ast_grep_language::LanguageExt;
    lang.ast_grep(source)
}

/// 1-based line of the first `ERROR` or missing node, depth-first.
///
/// Missing nodes are the zero-width leaves tree-sitter inserts to recover
/// from an absent token such as `;` or `}`. Errors that only hold a macro
/// specifier are skipped, see [`is_specifier_error`].
pub fn first_syntax_error<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<usize> {
    node.children().find_map(|child| {
        let missing = child.is_leaf() && child.range().is_empty();
        if is_specifier_error(&child) {
            None
        } else if child.kind().as_ref() == "ERROR" || missing {
            Some(child.start_pos().line() + 1)
        } else {
            first_syntax_error(&child)
        }
    })
}

/// An `ERROR` node holding a single identifier, optionally followed by `:`.
///
/// Export macros (`FAC_API int fac(int);`) and access labels of a class body
/// that was parsed as a block end up in such nodes while the surrounding
/// declaration parses normally.
pub fn is_specifier_error<D: ast_grep_core::Doc>(node: &Node<D>) -> bool {
    if node.kind().as_ref() != "ERROR" {
        return false;
    }
    let text = node.text();
    let word = text.trim().trim_end_matches(':').trim_end();
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
