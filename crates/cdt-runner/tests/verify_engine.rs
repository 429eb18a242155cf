//! Verification engine behaviour against a scripted backend.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use cdt_core::{FailurePolicy, TestNode};
use cdt_parser::ParseOptions;
use cdt_runner::{
    BackendError, CaseSeed, ExecutionBackend, RunReport, RunnerError, Session, Status, VerifyRequest,
    split_output, verify,
};
use pretty_assertions::assert_eq;

// ════════════════════════════════════════════════════════════════
// Scripted backend
// ════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
enum Reply {
    Prints(&'static str),
    CompileError(&'static str),
    Dies,
}

#[derive(Debug, Default)]
struct Journal {
    events: Vec<String>,
    seeds: Vec<CaseSeed>,
}

struct ScriptedBackend {
    replies: HashMap<String, Reply>,
    fail_seed: bool,
    journal: Rc<RefCell<Journal>>,
    open: bool,
}

impl ExecutionBackend for ScriptedBackend {
    fn open_case(&mut self, seed: &CaseSeed) -> Result<(), BackendError> {
        let mut journal = self.journal.borrow_mut();
        journal.events.push("open".to_string());
        journal.seeds.push(seed.clone());
        if self.fail_seed {
            return Err(BackendError::Seed("%lib rejected".to_string()));
        }
        self.open = true;
        Ok(())
    }

    fn execute(&mut self, statement: &str) -> Result<Vec<String>, BackendError> {
        self.journal.borrow_mut().events.push(statement.to_string());
        if !self.open {
            return Err(BackendError::Terminated("no case".to_string()));
        }
        match self.replies.get(statement).cloned() {
            None => Ok(Vec::new()),
            Some(Reply::Prints(text)) => Ok(split_output(text)),
            Some(Reply::CompileError(msg)) => Err(BackendError::Statement(msg.to_string())),
            Some(Reply::Dies) => {
                self.open = false;
                Err(BackendError::Terminated("segfault".to_string()))
            }
        }
    }

    fn close_case(&mut self) {
        if self.open {
            self.journal.borrow_mut().events.push("close".to_string());
        }
        self.open = false;
    }
}

struct Fixture {
    _dir: tempfile::TempDir,
    dir: PathBuf,
    journal: Rc<RefCell<Journal>>,
    session: Session,
}

fn fixture(replies: &[(&str, Reply)], fail_seed: bool) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("libfac.so"), b"").unwrap();
    std::fs::write(dir.path().join("fac.h"), b"int fac(int n);\n").unwrap();

    let journal = Rc::new(RefCell::new(Journal::default()));
    let replies: HashMap<String, Reply> = replies
        .iter()
        .map(|(cmd, reply)| ((*cmd).to_string(), reply.clone()))
        .collect();
    let shared = Rc::clone(&journal);
    let session = Session::new(ParseOptions::default(), move || {
        Ok(Box::new(ScriptedBackend {
            replies: replies.clone(),
            fail_seed,
            journal: Rc::clone(&shared),
            open: false,
        }) as Box<dyn ExecutionBackend>)
    });

    Fixture {
        dir: dir.path().to_path_buf(),
        _dir: dir,
        journal,
        session,
    }
}

fn request(dir: &Path, selected: &[&str], policy: FailurePolicy) -> VerifyRequest {
    VerifyRequest {
        artifact: PathBuf::from("fac"),
        search_dirs: vec![dir.to_path_buf()],
        selected_paths: selected.iter().map(ToString::to_string).collect(),
        module_name: "fac".to_string(),
        header_ext: "h".to_string(),
        failure_policy: policy,
    }
}

const FAC_HEADER: &str = "namespace test {
class Fac {
public:
    /**
    >>> test::Fac fac;
    >>> printf(\"%d\\n\", fac.fac(5));
    120
    */
    int fac(int n);
};
/**
>>> broken();
>>> after();
done
*/
int other();
}
";

const FAC_PRINTF: &str = "printf(\"%d\\n\", fac.fac(5));";

fn worklist(session: &mut Session) -> Vec<TestNode> {
    session.test_nodes(FAC_HEADER, Some("fac.h")).unwrap()
}

fn line_statuses(node: &TestNode) -> Vec<Option<bool>> {
    node.case.lines.iter().map(|l| l.is_pass).collect()
}

// ════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════

#[test]
fn factorial_case_passes_line_by_line() {
    let mut fx = fixture(&[(FAC_PRINTF, Reply::Prints("120\n"))], false);
    let mut nodes = worklist(&mut fx.session);
    let req = request(&fx.dir, &["fac.h::test::Fac::fac"], FailurePolicy::Continue);

    let outcome = verify(&mut fx.session, &req, &mut nodes).unwrap();

    assert_eq!(outcome.executed, 1);
    assert!(outcome.unmatched_selections.is_empty());
    let fac = &nodes[0];
    assert_eq!(line_statuses(fac), vec![Some(true), Some(true)]);
    assert_eq!(fac.is_pass(), Some(true));
    assert_eq!(fac.case.lines[1].actual, Some(vec!["120".to_string()]));
    assert_eq!(nodes[1].is_pass(), None, "unselected node must not run");
}

#[test]
fn each_case_gets_a_fresh_seeded_context() {
    let mut fx = fixture(&[], false);
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &[], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    let journal = fx.journal.borrow();
    assert_eq!(
        journal.events,
        vec![
            "open",
            "test::Fac fac;",
            "printf(\"%d\\n\", fac.fac(5));",
            "close",
            "open",
            "broken();",
            "after();",
            "close",
        ]
    );
    let seed = &journal.seeds[0];
    assert!(seed.library.ends_with("libfac.so"));
    assert!(seed.header.as_ref().is_some_and(|h| h.ends_with("fac.h")));
    assert_eq!(seed.include_dirs, vec![fx.dir.clone()]);
}

#[test]
fn mismatch_is_recorded_without_stopping() {
    let mut fx = fixture(&[(FAC_PRINTF, Reply::Prints("121\n"))], false);
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &[], FailurePolicy::AbortCase),
        &mut nodes,
    )
    .unwrap();

    let fac = &nodes[0];
    assert_eq!(line_statuses(fac), vec![Some(true), Some(false)]);
    assert_eq!(fac.case.lines[1].actual, Some(vec!["121".to_string()]));
    assert_eq!(fac.is_pass(), Some(false));
}

#[test]
fn continue_policy_runs_past_a_compile_error() {
    let mut fx = fixture(
        &[
            ("broken();", Reply::CompileError("use of undeclared identifier")),
            ("after();", Reply::Prints("done")),
        ],
        false,
    );
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &["fac.h::test::other"], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    let other = &nodes[1];
    assert_eq!(line_statuses(other), vec![Some(false), Some(true)]);
    assert!(
        other.case.lines[0]
            .diagnostic
            .as_deref()
            .is_some_and(|d| d.contains("undeclared"))
    );
    assert_eq!(other.is_pass(), Some(false));
}

#[test]
fn abort_policy_leaves_rest_of_case_unexecuted() {
    let mut fx = fixture(&[("broken();", Reply::CompileError("nope"))], false);
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &["fac.h::test::other"], FailurePolicy::AbortCase),
        &mut nodes,
    )
    .unwrap();

    assert_eq!(line_statuses(&nodes[1]), vec![Some(false), None]);
    assert_eq!(nodes[1].is_pass(), Some(false));
}

#[test]
fn lost_context_stops_case_even_when_continuing() {
    let mut fx = fixture(
        &[(FAC_PRINTF, Reply::Prints("120\n")), ("broken();", Reply::Dies)],
        false,
    );
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &[], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    assert_eq!(line_statuses(&nodes[0]), vec![Some(true), Some(true)]);
    assert_eq!(line_statuses(&nodes[1]), vec![Some(false), None]);
    assert!(!fx.journal.borrow().events.contains(&"after();".to_string()));
}

#[test]
fn seed_failure_fails_every_line() {
    let mut fx = fixture(&[], true);
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &["fac.h::test::Fac::fac"], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    let fac = &nodes[0];
    assert_eq!(line_statuses(fac), vec![Some(false), Some(false)]);
    assert!(fac.case.lines.iter().all(|l| l.diagnostic.is_some()));
}

#[test]
fn unmatched_selection_is_reported() {
    let mut fx = fixture(&[], false);
    let mut nodes = worklist(&mut fx.session);
    let outcome = verify(
        &mut fx.session,
        &request(
            &fx.dir,
            &["fac.h::test::Fac::fac", "fac.h::test::Fac::nope"],
            FailurePolicy::Continue,
        ),
        &mut nodes,
    )
    .unwrap();

    assert_eq!(outcome.executed, 1);
    assert_eq!(outcome.unmatched_selections, vec!["fac.h::test::Fac::nope"]);

    let report = RunReport::from_worklist(&nodes).with_unmatched(outcome.unmatched_selections);
    assert!(!report.is_success());
    assert_eq!(report.nodes[1].status, Status::NotRun);
}

#[test]
fn selection_matches_whole_paths_only() {
    let mut fx = fixture(&[(FAC_PRINTF, Reply::Prints("120\n"))], false);
    let mut nodes = worklist(&mut fx.session);
    let outcome = verify(
        &mut fx.session,
        &request(&fx.dir, &["fac.h::test", "fac.h::test::Fac"], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    assert_eq!(outcome.executed, 0);
    assert_eq!(
        outcome.unmatched_selections,
        vec!["fac.h::test", "fac.h::test::Fac"]
    );
    assert!(nodes.iter().all(|n| n.is_pass().is_none()));
    assert!(fx.journal.borrow().events.is_empty());
}

#[test]
fn trailing_whitespace_in_output_is_a_mismatch() {
    let mut fx = fixture(&[(FAC_PRINTF, Reply::Prints("120 \n"))], false);
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &["fac.h::test::Fac::fac"], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    assert_eq!(line_statuses(&nodes[0]), vec![Some(true), Some(false)]);
    assert_eq!(nodes[0].case.lines[1].actual, Some(vec!["120 ".to_string()]));
}

#[test]
fn unterminated_output_matches() {
    let mut fx = fixture(&[(FAC_PRINTF, Reply::Prints("120"))], false);
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &["fac.h::test::Fac::fac"], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    assert_eq!(nodes[0].is_pass(), Some(true));
}

#[test]
fn silent_line_fails_when_it_prints() {
    let mut fx = fixture(
        &[
            ("test::Fac fac;", Reply::Prints("constructed\n")),
            (FAC_PRINTF, Reply::Prints("120\n")),
        ],
        false,
    );
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &["fac.h::test::Fac::fac"], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    let fac = &nodes[0];
    assert_eq!(line_statuses(fac), vec![Some(false), Some(true)]);
    assert_eq!(fac.case.lines[0].actual, Some(vec!["constructed".to_string()]));
    assert_eq!(fac.is_pass(), Some(false));
}

#[test]
fn trailing_blank_line_is_part_of_the_output() {
    let mut fx = fixture(&[(FAC_PRINTF, Reply::Prints("120\n\n"))], false);
    let mut nodes = worklist(&mut fx.session);
    verify(
        &mut fx.session,
        &request(&fx.dir, &["fac.h::test::Fac::fac"], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap();

    let printf_line = &nodes[0].case.lines[1];
    assert_eq!(printf_line.actual, Some(vec!["120".to_string(), String::new()]));
    assert_eq!(printf_line.is_pass, Some(false));
}

#[test]
fn missing_artifact_runs_nothing() {
    let mut fx = fixture(&[], false);
    let mut nodes = worklist(&mut fx.session);
    let mut req = request(&fx.dir, &[], FailurePolicy::Continue);
    req.artifact = PathBuf::from("libmissing.so");

    let err = verify(&mut fx.session, &req, &mut nodes).unwrap_err();
    assert!(matches!(err, RunnerError::ArtifactNotFound { .. }));
    assert!(fx.journal.borrow().events.is_empty());
    assert!(nodes.iter().all(|n| n.is_pass().is_none()));
}

#[test]
fn missing_header_still_runs() {
    let mut fx = fixture(&[(FAC_PRINTF, Reply::Prints("120\n"))], false);
    let mut nodes = worklist(&mut fx.session);
    let mut req = request(&fx.dir, &["fac.h::test::Fac::fac"], FailurePolicy::Continue);
    req.module_name = "absent".to_string();

    verify(&mut fx.session, &req, &mut nodes).unwrap();
    assert_eq!(fx.journal.borrow().seeds[0].header, None);
    assert_eq!(nodes[0].is_pass(), Some(true));
}

#[test]
fn unavailable_backend_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("libfac.so"), b"").unwrap();
    let mut session = Session::new(ParseOptions::default(), || {
        Err(BackendError::Unavailable {
            binary: "clang-repl".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    });
    let mut nodes = worklist(&mut session);

    let err = verify(
        &mut session,
        &request(dir.path(), &[], FailurePolicy::Continue),
        &mut nodes,
    )
    .unwrap_err();
    assert!(matches!(err, RunnerError::Backend(BackendError::Unavailable { .. })));
}
