//! Declaration kinds and the policies that steer path resolution and execution.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! so they can be written in TOML config and JSON reports verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// DeclarationKind
// ---------------------------------------------------------------------------

/// The kind of declaration a doctest comment is attached to.
///
/// `struct` and `union` declarations are reported as [`Class`](Self::Class);
/// methods, constructors, destructors, operators and templates of any of
/// those are [`Function`](Self::Function).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Namespace,
    Class,
    Function,
}

impl DeclarationKind {
    /// Role suffix appended to the identifier in a `DocNode`'s `text`.
    #[must_use]
    pub const fn role_suffix(self) -> &'static str {
        match self {
            Self::Namespace => "::namespace",
            Self::Class => "::class",
            Self::Function => "",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Class => "class",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScopePolicy
// ---------------------------------------------------------------------------

/// How the scope chain of a declaration is assembled.
///
/// ```text
/// namespace test {
/// int Fac::fac(int n) { ... }   // lexical:   file::test::fac
/// }                             // qualified: file::test::Fac::fac
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopePolicy {
    /// Only lexically enclosing namespaces, classes and functions.
    #[default]
    Lexical,
    /// Lexical scopes plus the qualifier written on the declarator.
    Qualified,
}

impl ScopePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Qualified => "qualified",
        }
    }
}

impl fmt::Display for ScopePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lexical" => Ok(Self::Lexical),
            "qualified" => Ok(Self::Qualified),
            other => Err(CoreError::UnknownVariant {
                kind: "scope policy",
                value: other.to_string(),
                expected: "lexical, qualified",
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// FailurePolicy
// ---------------------------------------------------------------------------

/// What happens to the rest of a test case after one of its lines fails to
/// compile or run.
///
/// Output mismatches never stop a case; only execution failures do, and only
/// under [`AbortCase`](Self::AbortCase).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Keep submitting the remaining lines of the case.
    #[default]
    Continue,
    /// Leave the remaining lines of the case unexecuted.
    AbortCase,
}

impl FailurePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::AbortCase => "abort_case",
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailurePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continue" => Ok(Self::Continue),
            "abort_case" => Ok(Self::AbortCase),
            other => Err(CoreError::UnknownVariant {
                kind: "failure policy",
                value: other.to_string(),
                expected: "continue, abort_case",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DeclarationKind::Namespace, "::namespace")]
    #[case(DeclarationKind::Class, "::class")]
    #[case(DeclarationKind::Function, "")]
    fn role_suffixes(#[case] kind: DeclarationKind, #[case] suffix: &str) {
        assert_eq!(kind.role_suffix(), suffix);
    }

    #[test]
    fn policies_default_to_lexical_and_continue() {
        assert_eq!(ScopePolicy::default(), ScopePolicy::Lexical);
        assert_eq!(FailurePolicy::default(), FailurePolicy::Continue);
    }

    #[test]
    fn policy_strings_roundtrip_through_from_str() {
        for policy in [ScopePolicy::Lexical, ScopePolicy::Qualified] {
            assert_eq!(policy.as_str().parse::<ScopePolicy>().unwrap(), policy);
        }
        for policy in [FailurePolicy::Continue, FailurePolicy::AbortCase] {
            assert_eq!(policy.as_str().parse::<FailurePolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err = "semantic".parse::<ScopePolicy>().unwrap_err();
        assert!(err.to_string().contains("semantic"));
    }

    #[test]
    fn serde_matches_display() {
        let json = serde_json::to_string(&FailurePolicy::AbortCase).unwrap();
        assert_eq!(json, "\"abort_case\"");
        let kind: DeclarationKind = serde_json::from_str("\"namespace\"").unwrap();
        assert_eq!(kind, DeclarationKind::Namespace);
    }
}
