use std::process::ExitCode;

use cdt_config::CdtConfig;
use cdt_runner::Session;
use serde::Serialize;

use crate::cli::{GlobalFlags, InputArgs};
use crate::output::{JunitRender, TextRender, output};
use crate::pipeline::{build_worklist, resolve_inputs};

#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub path: String,
    pub text: String,
    pub line: usize,
    pub statements: usize,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub tests: Vec<ListEntry>,
}

impl JunitRender for ListResponse {}

impl TextRender for ListResponse {
    fn render_text(&self, flags: &GlobalFlags) -> String {
        let mut lines: Vec<String> = self
            .tests
            .iter()
            .map(|entry| {
                if flags.verbose {
                    format!(
                        "{}  ({}, line {}, {} statements)",
                        entry.path, entry.text, entry.line, entry.statements
                    )
                } else {
                    entry.path.clone()
                }
            })
            .collect();
        if !flags.quiet {
            lines.push(format!("{} test cases", self.total));
        }
        lines.join("\n")
    }
}

/// Handle `cdoctest list`.
pub fn handle(
    args: &InputArgs,
    session: &mut Session,
    config: &CdtConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let inputs = resolve_inputs(args, &config.run.header_ext)?;
    let worklist = build_worklist(session, &inputs, &config.run.marker)?;

    let tests: Vec<ListEntry> = worklist
        .iter()
        .map(|node| ListEntry {
            path: node.path().to_string(),
            text: node.text().to_string(),
            line: node.doc.line,
            statements: node.case.len(),
        })
        .collect();
    output(
        &ListResponse {
            total: tests.len(),
            tests,
        },
        flags,
    )?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use pretty_assertions::assert_eq;

    fn response() -> ListResponse {
        ListResponse {
            total: 2,
            tests: vec![
                ListEntry {
                    path: "fac.cpp::test::fac".to_string(),
                    text: "fac".to_string(),
                    line: 3,
                    statements: 1,
                },
                ListEntry {
                    path: "fac.h::test".to_string(),
                    text: "test::namespace".to_string(),
                    line: 2,
                    statements: 2,
                },
            ],
        }
    }

    #[test]
    fn text_lists_paths_then_count() {
        let flags = GlobalFlags {
            format: OutputFormat::Text,
            quiet: false,
            verbose: false,
        };
        assert_eq!(
            response().render_text(&flags),
            "fac.cpp::test::fac\nfac.h::test\n2 test cases"
        );
    }

    #[test]
    fn verbose_text_adds_details() {
        let flags = GlobalFlags {
            format: OutputFormat::Text,
            quiet: true,
            verbose: true,
        };
        assert_eq!(
            response().render_text(&flags),
            "fac.cpp::test::fac  (fac, line 3, 1 statements)\nfac.h::test  (test::namespace, line 2, 2 statements)"
        );
    }
}
