//! Human-readable rendering of command responses.

use std::fmt::Write as _;

use cdt_runner::{NodeReport, RunReport, Status};

use crate::cli::GlobalFlags;

/// Plain-text form of a response, used for `--format text`.
pub trait TextRender {
    fn render_text(&self, flags: &GlobalFlags) -> String;
}

impl TextRender for RunReport {
    fn render_text(&self, flags: &GlobalFlags) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let show = match node.status {
                Status::Failed => true,
                Status::Passed => !flags.quiet,
                Status::NotRun => flags.verbose,
            };
            if show {
                write_node(&mut out, node, flags.verbose);
            }
        }
        for path in &self.unmatched_selections {
            let _ = writeln!(out, "NO MATCH {path}");
        }
        let totals = &self.totals;
        let _ = write!(
            out,
            "{} passed, {} failed, {} not run ({} total)",
            totals.passed, totals.failed, totals.not_run, totals.nodes
        );
        out
    }
}

fn write_node(out: &mut String, node: &NodeReport, verbose: bool) {
    let label = match node.status {
        Status::Passed => "PASS",
        Status::Failed => "FAIL",
        Status::NotRun => "SKIP",
    };
    let _ = writeln!(out, "{label} {} (line {})", node.path, node.line);
    if node.status == Status::Passed && !verbose {
        return;
    }
    for line in &node.lines {
        let _ = writeln!(out, "    >>> {}  [{}]", line.cmd, line.status);
        if line.status != Status::Failed && !verbose {
            continue;
        }
        let _ = writeln!(out, "        expected: {:?}", line.expected);
        if let Some(actual) = &line.actual {
            let _ = writeln!(out, "        actual:   {actual:?}");
        }
        if let Some(diagnostic) = &line.diagnostic {
            let _ = writeln!(out, "        error:    {diagnostic}");
        }
    }
}
