//! Scope chain and path resolution for annotated declarations.
//!
//! Everything here is pure string work; the attacher feeds it the lexical
//! scope it has walked through and the name as written on the declarator.

use cdt_core::{DeclarationKind, ScopePolicy};

/// Placeholder file name used when the caller supplies none.
pub const DEFAULT_FILENAME: &str = "sample.cpp";

/// Name used for unnamed namespaces, classes, structs and unions.
pub const ANONYMOUS: &str = "(anonymous)";

/// A declarator name split into its written qualifier and own identifier.
///
/// `test::Fac::fac` becomes `qualifier = ["test", "Fac"]`, `name = "fac"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclName {
    pub qualifier: Vec<String>,
    pub name: String,
}

impl DeclName {
    /// Split a possibly qualified name as written in source.
    #[must_use]
    pub fn parse(written: &str) -> Self {
        let mut segments = split_qualified(written);
        let name = segments.pop().unwrap_or_else(|| ANONYMOUS.to_string());
        Self {
            qualifier: segments,
            name,
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            qualifier: Vec::new(),
            name: ANONYMOUS.to_string(),
        }
    }
}

/// Result of resolving one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Identifier plus role suffix, e.g. `Fac::class`.
    pub text: String,
    /// `filename::scope::chain::name`.
    pub path: String,
    /// Segments this declaration adds to the scope of anything nested in it.
    pub own_segments: Vec<String>,
}

/// Resolve the `text` and `path` of a declaration.
///
/// `lexical_scope` holds the enclosing namespaces, classes and functions,
/// outer to inner. Under [`ScopePolicy::Lexical`] a declarator qualifier such
/// as the `Fac::` of an out-of-line `int Fac::fac(int)` is ignored; under
/// [`ScopePolicy::Qualified`] it is spliced in before the name. The segments
/// of a nested namespace definition (`namespace a::b`) always count, since
/// they open real lexical scopes.
#[must_use]
pub fn resolve(
    kind: DeclarationKind,
    decl: &DeclName,
    lexical_scope: &[String],
    filename: Option<&str>,
    policy: ScopePolicy,
) -> Resolved {
    let include_qualifier = match kind {
        DeclarationKind::Namespace => true,
        DeclarationKind::Class | DeclarationKind::Function => policy == ScopePolicy::Qualified,
    };

    let mut own_segments = Vec::with_capacity(decl.qualifier.len() + 1);
    if include_qualifier {
        own_segments.extend(decl.qualifier.iter().cloned());
    }
    own_segments.push(decl.name.clone());

    let identifier = match kind {
        DeclarationKind::Namespace => own_segments.join("::"),
        DeclarationKind::Class | DeclarationKind::Function => decl.name.clone(),
    };
    let text = format!("{identifier}{}", kind.role_suffix());

    let filename = filename.unwrap_or(DEFAULT_FILENAME);
    let chain = lexical_scope
        .iter()
        .chain(own_segments.iter())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("::");
    let path = format!("{filename}::{chain}");

    Resolved {
        text,
        path,
        own_segments,
    }
}

/// Split a name on top-level `::`, leaving template argument lists intact.
///
/// Whitespace inside each segment is collapsed so `operator ()` and
/// `operator()` resolve identically. A leading `::` (global qualifier) yields
/// no empty segment.
#[must_use]
pub fn split_qualified(written: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = written.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                depth += 1;
                current.push(c);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ':' if depth == 0 && chars.peek() == Some(&':') => {
                chars.next();
                push_segment(&mut segments, &current);
                current.clear();
            }
            _ => current.push(c),
        }
    }
    push_segment(&mut segments, &current);
    segments
}

fn push_segment(segments: &mut Vec<String>, raw: &str) {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return;
    }
    // `operator <` and `operator<` must compare equal.
    let collapsed = collapsed
        .strip_prefix("operator ")
        .map_or(collapsed.clone(), |op| format!("operator{op}"));
    segments.push(collapsed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn scope(segments: &[&str]) -> Vec<String> {
        segments.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case("fac", &[], "fac")]
    #[case("Fac::fac", &["Fac"], "fac")]
    #[case("::test::Fac::fac", &["test", "Fac"], "fac")]
    #[case("Box<std::string>::get", &["Box<std::string>"], "get")]
    #[case("Fac::~Fac", &["Fac"], "~Fac")]
    #[case("Fac::operator <", &["Fac"], "operator<")]
    fn decl_name_parsing(#[case] written: &str, #[case] qualifier: &[&str], #[case] name: &str) {
        let decl = DeclName::parse(written);
        assert_eq!(decl.qualifier, scope(qualifier));
        assert_eq!(decl.name, name);
    }

    #[test]
    fn function_text_is_bare_identifier() {
        let resolved = resolve(
            DeclarationKind::Function,
            &DeclName::parse("fac"),
            &[],
            None,
            ScopePolicy::Lexical,
        );
        assert_eq!(resolved.text, "fac");
        assert_eq!(resolved.path, "sample.cpp::fac");
    }

    #[test]
    fn class_and_namespace_carry_role_suffix() {
        let class = resolve(
            DeclarationKind::Class,
            &DeclName::parse("Fac"),
            &scope(&["test"]),
            Some("fac.h"),
            ScopePolicy::Lexical,
        );
        assert_eq!(class.text, "Fac::class");
        assert_eq!(class.path, "fac.h::test::Fac");

        let ns = resolve(
            DeclarationKind::Namespace,
            &DeclName::parse("test"),
            &[],
            Some("fac.h"),
            ScopePolicy::Lexical,
        );
        assert_eq!(ns.text, "test::namespace");
        assert_eq!(ns.path, "fac.h::test");
    }

    #[rstest]
    #[case(ScopePolicy::Lexical, "sample.cpp::test::fac")]
    #[case(ScopePolicy::Qualified, "sample.cpp::test::Fac::fac")]
    fn out_of_line_member_follows_policy(#[case] policy: ScopePolicy, #[case] path: &str) {
        let resolved = resolve(
            DeclarationKind::Function,
            &DeclName::parse("Fac::fac"),
            &scope(&["test"]),
            None,
            policy,
        );
        assert_eq!(resolved.path, path);
        assert_eq!(resolved.text, "fac");
    }

    #[test]
    fn nested_namespace_definition_always_opens_every_segment() {
        let resolved = resolve(
            DeclarationKind::Namespace,
            &DeclName::parse("a::b"),
            &[],
            None,
            ScopePolicy::Lexical,
        );
        assert_eq!(resolved.text, "a::b::namespace");
        assert_eq!(resolved.path, "sample.cpp::a::b");
        assert_eq!(resolved.own_segments, scope(&["a", "b"]));
    }

    #[test]
    fn anonymous_scope_name() {
        let resolved = resolve(
            DeclarationKind::Namespace,
            &DeclName::anonymous(),
            &[],
            None,
            ScopePolicy::Lexical,
        );
        assert_eq!(resolved.path, "sample.cpp::(anonymous)");
    }
}
