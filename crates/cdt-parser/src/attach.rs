//! Comment attacher: walks a C/C++ syntax tree depth-first and emits a
//! [`DocNode`] for every namespace, class and function declaration that is
//! immediately preceded by a comment.
//!
//! Recognised containers: the translation unit, namespace bodies, class
//! bodies, function bodies (local classes), `extern "C"` blocks, template
//! declarations and preprocessor conditionals (`#ifndef` include guards).

mod comments;
mod declarators;

#[cfg(test)]
mod tests;

use std::path::Path;

use ast_grep_core::Node;
use cdt_core::{DeclarationKind, DocNode, ScopePolicy, TestNode};
use serde::{Deserialize, Serialize};

use crate::error::ParserError;
use crate::extract::{PROMPT_MARKER, filter_tests_with_marker};
use crate::parser::{detect_language, first_syntax_error, parse_source};
use crate::scope::{self, DEFAULT_FILENAME, DeclName};

/// Knobs for [`SourceParser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub scope_policy: ScopePolicy,
    /// Attach comments from trees that contain syntax errors instead of
    /// failing with [`ParserError::ParseFailed`].
    pub tolerate_errors: bool,
    /// File name used in paths (and for language detection) when the caller
    /// supplies none.
    pub default_filename: String,
    /// Prefix that introduces a statement line inside a doctest comment.
    pub marker: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            scope_policy: ScopePolicy::default(),
            tolerate_errors: false,
            default_filename: DEFAULT_FILENAME.to_string(),
            marker: PROMPT_MARKER.to_string(),
        }
    }
}

/// Session-scoped C/C++ parser.
#[derive(Debug, Clone, Default)]
pub struct SourceParser {
    options: ParseOptions,
}

impl SourceParser {
    #[must_use]
    pub const fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `source` and attach every eligible comment to its declaration.
    ///
    /// `filename` prefixes every path and selects the grammar from its
    /// extension; `None` uses [`ParseOptions::default_filename`].
    ///
    /// # Errors
    ///
    /// [`ParserError::UnsupportedLanguage`] when the extension is not a C/C++
    /// one, and [`ParserError::ParseFailed`] when the tree contains syntax
    /// errors and `tolerate_errors` is off. No doc nodes are returned on
    /// failure.
    pub fn attach(&self, source: &str, filename: Option<&str>) -> Result<Vec<DocNode>, ParserError> {
        let filename = filename.unwrap_or(&self.options.default_filename);
        let lang = detect_language(filename)
            .ok_or_else(|| ParserError::UnsupportedLanguage(filename.to_string()))?;

        let tree = parse_source(source, lang);
        let root = tree.root();

        if let Some(line) = first_syntax_error(&root) {
            if !self.options.tolerate_errors {
                return Err(ParserError::ParseFailed {
                    file: filename.to_string(),
                    message: format!("syntax error at line {line}"),
                });
            }
            tracing::warn!(file = filename, line, "attaching comments from a tree with syntax errors");
        }

        let mut walker = Walker {
            filename,
            policy: self.options.scope_policy,
            scope: Vec::new(),
            docs: Vec::new(),
        };
        walker.visit_children(&root);

        tracing::debug!(file = filename, count = walker.docs.len(), "attached doc comments");
        Ok(walker.docs)
    }

    /// Read `path` from disk and attach its comments, using the path as written
    /// for the doc node paths.
    ///
    /// # Errors
    ///
    /// [`ParserError::Io`] when the file cannot be read, otherwise as
    /// [`attach`](Self::attach).
    pub fn attach_file(&self, path: &Path) -> Result<Vec<DocNode>, ParserError> {
        self.attach_file_as(path, &path.to_string_lossy())
    }

    /// Read `path` from disk but name its doc node paths after `name`, e.g.
    /// a path relative to the project root.
    ///
    /// # Errors
    ///
    /// As [`attach_file`](Self::attach_file).
    pub fn attach_file_as(&self, path: &Path, name: &str) -> Result<Vec<DocNode>, ParserError> {
        let source = std::fs::read_to_string(path).map_err(|source| ParserError::Io {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;
        self.attach(&source, Some(name))
    }

    /// [`attach`](Self::attach) followed by test extraction with the
    /// configured marker.
    ///
    /// # Errors
    ///
    /// As [`attach`](Self::attach).
    pub fn test_nodes(&self, source: &str, filename: Option<&str>) -> Result<Vec<TestNode>, ParserError> {
        let docs = self.attach(source, filename)?;
        Ok(filter_tests_with_marker(docs, &self.options.marker))
    }
}

/// Attach with default options.
///
/// # Errors
///
/// As [`SourceParser::attach`].
pub fn attach(source: &str, filename: Option<&str>) -> Result<Vec<DocNode>, ParserError> {
    SourceParser::default().attach(source, filename)
}

// ── Tree walk ──────────────────────────────────────────────────────

struct Walker<'f> {
    filename: &'f str,
    policy: ScopePolicy,
    scope: Vec<String>,
    docs: Vec<DocNode>,
}

impl Walker<'_> {
    fn visit_children<D: ast_grep_core::Doc>(&mut self, container: &Node<D>) {
        let children: Vec<_> = container.children().collect();
        for (idx, child) in children.iter().enumerate() {
            self.dispatch(child, &children, idx);
        }
    }

    /// `siblings[idx]` is the node whose preceding comment is used. For
    /// wrappers it is the wrapper, while `node` is the declaration inside it.
    fn dispatch<D: ast_grep_core::Doc>(&mut self, node: &Node<D>, siblings: &[Node<D>], idx: usize) {
        match node.kind().as_ref() {
            "namespace_definition" => self.process_namespace(node, siblings, idx),
            "class_specifier" | "struct_specifier" | "union_specifier" => {
                self.process_class(node, siblings, idx);
            }
            "function_definition" => self.process_function_definition(node, siblings, idx),
            "declaration" | "field_declaration" => self.process_declaration(node, siblings, idx),
            "template_declaration" | "attributed_declaration" | "friend_declaration" => {
                self.process_wrapper(node, siblings, idx);
            }
            "type_definition" => self.process_type_definition(node, siblings, idx),
            "linkage_specification" => {
                for inner in node.children() {
                    if inner.kind().as_ref() == "declaration_list" {
                        self.visit_children(&inner);
                    } else {
                        self.dispatch(&inner, siblings, idx);
                    }
                }
            }
            "preproc_if" | "preproc_ifdef" | "preproc_else" | "preproc_elif" | "preproc_elifdef" => {
                self.visit_children(node);
            }
            _ => {}
        }
    }

    /// Declarations nested in a wrapper are documented by the comment before
    /// the wrapper, or failing that by one inside it (`template <...>` then
    /// comment then declaration).
    fn process_wrapper<D: ast_grep_core::Doc>(&mut self, node: &Node<D>, siblings: &[Node<D>], idx: usize) {
        let inner: Vec<_> = node.children().collect();
        let wrapper_documented = comments::preceding_comment(siblings, idx).is_some();
        for (pos, child) in inner.iter().enumerate() {
            if !wrapper_documented && comments::preceding_comment(&inner, pos).is_some() {
                self.dispatch(child, &inner, pos);
            } else {
                self.dispatch(child, siblings, idx);
            }
        }
    }

    /// `typedef struct { ... } Name;` documents the struct under the typedef
    /// name when the struct itself is anonymous.
    fn process_type_definition<D: ast_grep_core::Doc>(
        &mut self,
        node: &Node<D>,
        siblings: &[Node<D>],
        idx: usize,
    ) {
        let children: Vec<_> = node.children().collect();
        let Some(class) = children.iter().find(|c| is_class_kind(c) && has_class_body(c)) else {
            return;
        };
        let alias = children
            .iter()
            .rev()
            .find(|c| c.kind().as_ref() == "type_identifier")
            .map(|c| DeclName::parse(&c.text()));
        let name = class_name(class).or(alias);
        self.process_class_named(class, name, siblings, idx);
    }

    fn process_namespace<D: ast_grep_core::Doc>(&mut self, node: &Node<D>, siblings: &[Node<D>], idx: usize) {
        let children: Vec<_> = node.children().collect();
        let decl = children
            .iter()
            .find(|c| matches!(c.kind().as_ref(), "namespace_identifier" | "nested_namespace_specifier"))
            .map_or_else(DeclName::anonymous, |c| DeclName::parse(&c.text()));

        let pushed = self.emit(DeclarationKind::Namespace, &decl, siblings, idx);
        if let Some(body) = children.iter().find(|c| c.kind().as_ref() == "declaration_list") {
            self.within(pushed, |walker| walker.visit_children(body));
        }
    }

    fn process_class<D: ast_grep_core::Doc>(&mut self, node: &Node<D>, siblings: &[Node<D>], idx: usize) {
        self.process_class_named(node, class_name(node), siblings, idx);
    }

    fn process_class_named<D: ast_grep_core::Doc>(
        &mut self,
        node: &Node<D>,
        name: Option<DeclName>,
        siblings: &[Node<D>],
        idx: usize,
    ) {
        let decl = name.unwrap_or_else(DeclName::anonymous);
        let pushed = self.emit(DeclarationKind::Class, &decl, siblings, idx);
        if let Some(body) = node.children().find(|c| c.kind().as_ref() == "field_declaration_list") {
            self.within(pushed, |walker| walker.visit_children(&body));
        }
    }

    fn process_function_definition<D: ast_grep_core::Doc>(
        &mut self,
        node: &Node<D>,
        siblings: &[Node<D>],
        idx: usize,
    ) {
        let Some(decl) = declarators::function_name(node) else {
            // `class FAC_API Fac { ... };` parses as a function definition
            // returning `class FAC_API` named `Fac` with a compound body.
            if let Some((decl, body)) = macro_decorated_class(node) {
                let pushed = self.emit(DeclarationKind::Class, &decl, siblings, idx);
                self.within(pushed, |walker| walker.visit_children(&body));
            }
            return;
        };
        let pushed = self.emit(DeclarationKind::Function, &decl, siblings, idx);
        if let Some(body) = node.children().find(|c| c.kind().as_ref() == "compound_statement") {
            self.within(pushed, |walker| walker.visit_children(&body));
        }
    }

    /// Prototypes, member declarations and `struct S { ... } s;` style
    /// declarations that wrap a class body.
    fn process_declaration<D: ast_grep_core::Doc>(&mut self, node: &Node<D>, siblings: &[Node<D>], idx: usize) {
        let wrapped_class = node.children().find(|c| is_class_kind(c) && has_class_body(c));
        if let Some(class) = wrapped_class {
            self.process_class(&class, siblings, idx);
            return;
        }

        if let Some(decl) = declarators::function_name(node) {
            self.emit(DeclarationKind::Function, &decl, siblings, idx);
        }
    }

    /// Record a doc node when a comment precedes `siblings[idx]`, and return
    /// the scope segments the declaration opens for its children.
    fn emit<D: ast_grep_core::Doc>(
        &mut self,
        kind: DeclarationKind,
        decl: &DeclName,
        siblings: &[Node<D>],
        idx: usize,
    ) -> Vec<String> {
        let resolved = scope::resolve(kind, decl, &self.scope, Some(self.filename), self.policy);
        if let Some(comment_spelling) = comments::preceding_comment(siblings, idx) {
            tracing::trace!(path = %resolved.path, "comment attached");
            self.docs.push(DocNode {
                comment_spelling,
                text: resolved.text,
                path: resolved.path,
                kind,
                line: siblings[idx].start_pos().line() + 1,
            });
        }
        resolved.own_segments
    }

    fn within(&mut self, segments: Vec<String>, body: impl FnOnce(&mut Self)) {
        let depth = self.scope.len();
        self.scope.extend(segments);
        body(self);
        self.scope.truncate(depth);
    }
}

fn is_class_kind<D: ast_grep_core::Doc>(node: &Node<D>) -> bool {
    matches!(node.kind().as_ref(), "class_specifier" | "struct_specifier" | "union_specifier")
}

fn has_class_body<D: ast_grep_core::Doc>(node: &Node<D>) -> bool {
    node.children().any(|c| c.kind().as_ref() == "field_declaration_list")
}

/// The last name before the body, so `class FAC_API Fac` names `Fac`.
fn class_name<D: ast_grep_core::Doc>(node: &Node<D>) -> Option<DeclName> {
    node.children()
        .take_while(|c| c.kind().as_ref() != "field_declaration_list")
        .filter(|c| {
            matches!(
                c.kind().as_ref(),
                "type_identifier" | "qualified_type_identifier" | "template_type"
            )
        })
        .last()
        .map(|c| DeclName::parse(&c.text()))
}

fn macro_decorated_class<'r, D: ast_grep_core::Doc>(node: &Node<'r, D>) -> Option<(DeclName, Node<'r, D>)> {
    let mut declares_class = false;
    let mut name = None;
    let mut body = None;
    for child in node.children() {
        let kind = child.kind().into_owned();
        match kind.as_str() {
            "class_specifier" | "struct_specifier" | "union_specifier" => {
                declares_class = !has_class_body(&child);
            }
            "identifier" => name = Some(DeclName::parse(&child.text())),
            "compound_statement" => body = Some(child),
            _ => {}
        }
    }
    if !declares_class {
        return None;
    }
    Some((name?, body?))
}
