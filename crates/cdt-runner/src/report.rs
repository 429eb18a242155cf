//! Serializable summary of a verified worklist.

use cdt_core::{TestLine, TestNode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Passed,
    Failed,
    NotRun,
}

impl Status {
    #[must_use]
    pub const fn from_result(is_pass: Option<bool>) -> Self {
        match is_pass {
            Some(true) => Self::Passed,
            Some(false) => Self::Failed,
            None => Self::NotRun,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::NotRun => "not_run",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineReport {
    pub cmd: String,
    pub expected: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Vec<String>>,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeReport {
    pub path: String,
    pub text: String,
    pub line: usize,
    pub status: Status,
    pub lines: Vec<LineReport>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub nodes: usize,
    pub passed: usize,
    pub failed: usize,
    pub not_run: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub totals: RunTotals,
    pub nodes: Vec<NodeReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched_selections: Vec<String>,
}

impl RunReport {
    #[must_use]
    pub fn from_worklist(worklist: &[TestNode]) -> Self {
        let nodes: Vec<NodeReport> = worklist.iter().map(node_report).collect();
        let mut totals = RunTotals {
            nodes: nodes.len(),
            ..RunTotals::default()
        };
        for node in &nodes {
            match node.status {
                Status::Passed => totals.passed += 1,
                Status::Failed => totals.failed += 1,
                Status::NotRun => totals.not_run += 1,
            }
        }
        Self {
            totals,
            nodes,
            unmatched_selections: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_unmatched(mut self, unmatched_selections: Vec<String>) -> Self {
        self.unmatched_selections = unmatched_selections;
        self
    }

    /// No executed node failed and every selection matched.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.totals.failed == 0 && self.unmatched_selections.is_empty()
    }
}

fn node_report(node: &TestNode) -> NodeReport {
    NodeReport {
        path: node.path().to_string(),
        text: node.text().to_string(),
        line: node.doc.line,
        status: Status::from_result(node.is_pass()),
        lines: node.case.lines.iter().map(line_report).collect(),
    }
}

fn line_report(line: &TestLine) -> LineReport {
    LineReport {
        cmd: line.cmd.clone(),
        expected: line.outputs.clone(),
        actual: line.actual.clone(),
        status: Status::from_result(line.is_pass),
        diagnostic: line.diagnostic.clone(),
    }
}
