//! JUnit XML rendering for CI test reporters.

use std::fmt::Write as _;

use cdt_runner::{NodeReport, RunReport, Status};

/// JUnit XML form of a response, used for `--format junit`.
///
/// Responses without a test outcome keep the default and are refused.
pub trait JunitRender {
    fn render_junit(&self) -> Option<String> {
        None
    }
}

impl JunitRender for RunReport {
    fn render_junit(&self) -> Option<String> {
        let totals = &self.totals;
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        let _ = writeln!(
            out,
            "<testsuites tests=\"{}\" failures=\"{}\" skipped=\"{}\">",
            totals.nodes, totals.failed, totals.not_run
        );
        let _ = writeln!(
            out,
            "  <testsuite name=\"cdoctest\" tests=\"{}\" failures=\"{}\" skipped=\"{}\">",
            totals.nodes, totals.failed, totals.not_run
        );
        for node in &self.nodes {
            write_case(&mut out, node);
        }
        out.push_str("  </testsuite>\n</testsuites>");
        Some(out)
    }
}

fn write_case(out: &mut String, node: &NodeReport) {
    let file = node.path.split("::").next().unwrap_or_default();
    let _ = write!(
        out,
        "    <testcase name=\"{}\" classname=\"{}\" line=\"{}\"",
        escape(&node.path),
        escape(file),
        node.line
    );
    match node.status {
        Status::Passed => out.push_str("/>\n"),
        Status::NotRun => out.push_str(">\n      <skipped/>\n    </testcase>\n"),
        Status::Failed => {
            let details = failure_details(node);
            let message = details.lines().next().unwrap_or("failed");
            let _ = writeln!(
                out,
                ">\n      <failure message=\"{}\">{}</failure>\n    </testcase>",
                escape(message),
                escape(&details)
            );
        }
    }
}

/// One entry per failed line: the statement, then what was expected and seen.
fn failure_details(node: &NodeReport) -> String {
    let mut details = String::new();
    for line in node.lines.iter().filter(|l| l.status == Status::Failed) {
        let _ = writeln!(details, ">>> {}", line.cmd);
        let _ = writeln!(details, "expected: {:?}", line.expected);
        if let Some(actual) = &line.actual {
            let _ = writeln!(details, "actual: {actual:?}");
        }
        if let Some(diagnostic) = &line.diagnostic {
            let _ = writeln!(details, "error: {diagnostic}");
        }
    }
    details
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            c if c.is_control() && c != '\t' => {}
            c => escaped.push(c),
        }
    }
    escaped
}
