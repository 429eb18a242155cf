//! Execution and verification of a worklist.

use std::collections::HashSet;
use std::path::PathBuf;

use cdt_core::{FailurePolicy, TestNode};

use crate::artifact::{resolve_artifact, resolve_header};
use crate::backend::{CaseSeed, ExecutionBackend};
use crate::error::RunnerError;
use crate::session::Session;

/// Inputs to one verification run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyRequest {
    /// Shared library under test, absolute or relative to a search dir.
    pub artifact: PathBuf,
    /// Where the artifact and header are looked up; also the include path.
    pub search_dirs: Vec<PathBuf>,
    /// Exact node paths to run. Empty runs every node.
    pub selected_paths: Vec<String>,
    /// Stem of the header included into every case.
    pub module_name: String,
    pub header_ext: String,
    pub failure_policy: FailurePolicy,
}

/// What a verification run did besides mutating the worklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Number of test nodes that were run.
    pub executed: usize,
    /// Selected paths that matched no node.
    pub unmatched_selections: Vec<String>,
}

/// Run the selected nodes of `worklist` and record results on them.
///
/// Each node gets a fresh backend context. Within a case, statements run in
/// order and see earlier declarations. A statement failure is recorded on
/// its line and, under [`FailurePolicy::AbortCase`], leaves the rest of the
/// case unexecuted; a lost context always does.
///
/// # Errors
///
/// [`RunnerError::ArtifactNotFound`] before anything runs, or
/// [`RunnerError::Backend`] when the backend cannot be started.
pub fn verify(
    session: &mut Session,
    request: &VerifyRequest,
    worklist: &mut [TestNode],
) -> Result<VerifyOutcome, RunnerError> {
    let library = resolve_artifact(&request.artifact, &request.search_dirs)?;
    let header = resolve_header(&request.module_name, &request.header_ext, &request.search_dirs);
    if header.is_none() {
        tracing::warn!(
            module = %request.module_name,
            ext = %request.header_ext,
            "header not found; cases run without it"
        );
    }

    let known: HashSet<&str> = worklist.iter().map(TestNode::path).collect();
    let unmatched_selections: Vec<String> = request
        .selected_paths
        .iter()
        .filter(|path| !known.contains(path.as_str()))
        .cloned()
        .collect();
    for path in &unmatched_selections {
        tracing::warn!(path = %path, "selected test case matches no doc node");
    }

    let seed = CaseSeed {
        library,
        include_dirs: request.search_dirs.clone(),
        header,
    };
    let selected: HashSet<&str> = request.selected_paths.iter().map(String::as_str).collect();
    let backend = session.backend()?;

    let mut executed = 0;
    for node in worklist
        .iter_mut()
        .filter(|node| selected.is_empty() || selected.contains(node.path()))
    {
        run_case(backend, &seed, node, request.failure_policy)?;
        executed += 1;
    }

    tracing::info!(executed, unmatched = unmatched_selections.len(), "verification finished");
    Ok(VerifyOutcome {
        executed,
        unmatched_selections,
    })
}

fn run_case(
    backend: &mut dyn ExecutionBackend,
    seed: &CaseSeed,
    node: &mut TestNode,
    policy: FailurePolicy,
) -> Result<(), RunnerError> {
    tracing::debug!(path = node.path(), lines = node.case.len(), "running test case");
    node.case.reset();

    if let Err(err) = backend.open_case(seed) {
        if err.is_fatal() {
            return Err(err.into());
        }
        let diagnostic = err.to_string();
        for line in &mut node.case.lines {
            line.record_failure(diagnostic.clone());
        }
        backend.close_case();
        node.case.aggregate();
        return Ok(());
    }

    for line in &mut node.case.lines {
        match backend.execute(&line.cmd) {
            Ok(actual) => {
                let pass = actual == line.outputs;
                if !pass {
                    tracing::debug!(cmd = %line.cmd, expected = ?line.outputs, ?actual, "output mismatch");
                }
                line.record_output(actual, pass);
            }
            Err(err) if err.is_fatal() => {
                backend.close_case();
                return Err(err.into());
            }
            Err(err) => {
                tracing::debug!(cmd = %line.cmd, error = %err, "statement failed");
                let lost = err.context_lost();
                line.record_failure(err.to_string());
                if lost || policy == FailurePolicy::AbortCase {
                    break;
                }
            }
        }
    }

    backend.close_case();
    let pass = node.case.aggregate();
    tracing::debug!(path = node.path(), pass, "test case finished");
    Ok(())
}

/// Split raw captured text into the lines an [`ExecutionBackend`] reports:
/// on `\n` or `\r\n`, where only the final terminator closes the last line
/// and blank lines before it are kept.
#[must_use]
pub fn split_output(captured: &str) -> Vec<String> {
    if captured.is_empty() {
        return Vec::new();
    }
    let body = captured.strip_suffix('\n').unwrap_or(captured);
    body.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", &[])]
    #[case("120", &["120"])]
    #[case("120\n", &["120"])]
    #[case("1\r\n2\r\n", &["1", "2"])]
    #[case("a\n\nb", &["a", "", "b"])]
    #[case("a\n\n", &["a", ""])]
    #[case("\n", &[""])]
    #[case("120 \n", &["120 "])]
    fn output_splitting(#[case] captured: &str, #[case] expected: &[&str]) {
        assert_eq!(split_output(captured), expected);
    }
}
