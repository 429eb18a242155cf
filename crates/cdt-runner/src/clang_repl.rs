//! `clang-repl` subprocess backend.
//!
//! One interpreter process serves one test case. Statements go in on stdin;
//! after each one a fence prints a unique sentinel line to stdout and
//! stderr, so the output of the statement is everything read before the
//! sentinel arrives.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::backend::{CaseSeed, ExecutionBackend};
use crate::error::BackendError;

const SENTINEL_PREFIX: &str = "__cdoctest_";

/// Settings for spawning `clang-repl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClangReplOptions {
    /// Interpreter executable, looked up on `PATH` when not a path.
    pub binary: String,
    /// Extra arguments appended after the include directories.
    pub args: Vec<String>,
    /// Prompt the interpreter prints before reading each input line.
    pub prompt: String,
    pub statement_timeout: Duration,
}

impl Default for ClangReplOptions {
    fn default() -> Self {
        Self {
            binary: "clang-repl".to_string(),
            args: Vec::new(),
            prompt: "clang-repl> ".to_string(),
            statement_timeout: Duration::from_secs(30),
        }
    }
}

/// [`ExecutionBackend`] driving a `clang-repl` process per case.
#[derive(Debug)]
pub struct ClangRepl {
    options: ClangReplOptions,
    process: Option<ReplProcess>,
    fences: u64,
}

#[derive(Debug)]
struct ReplProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: Receiver<String>,
    stderr: Receiver<String>,
}

/// What one statement printed, split at its sentinel.
#[derive(Debug, Default, PartialEq, Eq)]
struct Capture {
    stdout: Vec<String>,
    stderr: Vec<String>,
}

impl ClangRepl {
    #[must_use]
    pub const fn new(options: ClangReplOptions) -> Self {
        Self {
            options,
            process: None,
            fences: 0,
        }
    }

    fn spawn(&self, seed: &CaseSeed) -> Result<ReplProcess, BackendError> {
        let mut child = Command::new(&self.options.binary)
            .args(command_args(&self.options, &seed.include_dirs))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| BackendError::Unavailable {
                binary: self.options.binary.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(BackendError::Terminated(
                "interpreter pipes were not available".to_string(),
            ));
        };

        tracing::debug!(pid = child.id(), binary = %self.options.binary, "clang-repl started");
        Ok(ReplProcess {
            child,
            stdin,
            stdout: forward_lines(stdout),
            stderr: forward_lines(stderr),
        })
    }

    fn run_statement(&mut self, statement: &str) -> Result<Capture, BackendError> {
        self.fences += 1;
        let fence = self.fences;
        let timeout = self.options.statement_timeout;
        let prompt = self.options.prompt.clone();

        let Some(process) = self.process.as_mut() else {
            return Err(BackendError::Terminated("no case is open".to_string()));
        };
        let sentinel = sentinel(process.child.id(), fence);

        writeln!(process.stdin, "{}", single_line(statement))?;
        writeln!(process.stdin, "{}", fence_statement(process.child.id(), fence))?;
        process.stdin.flush()?;

        let deadline = Deadline::after(timeout);
        let result = read_until_sentinel(&process.stdout, &sentinel, &prompt, deadline).and_then(
            |stdout| {
                read_until_sentinel(&process.stderr, &sentinel, &prompt, deadline)
                    .map(|stderr| Capture { stdout, stderr })
            },
        );

        if let Err(err) = &result
            && err.context_lost()
        {
            tracing::warn!(statement, error = %err, "clang-repl context lost");
            self.close_case();
        }
        result
    }
}

impl Default for ClangRepl {
    fn default() -> Self {
        Self::new(ClangReplOptions::default())
    }
}

impl ExecutionBackend for ClangRepl {
    fn open_case(&mut self, seed: &CaseSeed) -> Result<(), BackendError> {
        self.close_case();
        self.process = Some(self.spawn(seed)?);

        for statement in seed_statements(seed) {
            let capture = self
                .run_statement(&statement)
                .map_err(|err| BackendError::Seed(format!("{statement}: {err}")))?;
            if let Some(diagnostic) = compile_error(&capture.stderr) {
                return Err(BackendError::Seed(format!("{statement}: {diagnostic}")));
            }
        }
        Ok(())
    }

    fn execute(&mut self, statement: &str) -> Result<Vec<String>, BackendError> {
        let capture = self.run_statement(statement)?;
        if let Some(diagnostic) = compile_error(&capture.stderr) {
            return Err(BackendError::Statement(diagnostic));
        }
        Ok(capture.stdout)
    }

    fn close_case(&mut self) {
        let Some(mut process) = self.process.take() else {
            return;
        };
        if let Err(error) = process.child.kill() {
            tracing::debug!(%error, "clang-repl already exited");
        }
        if let Err(error) = process.child.wait() {
            tracing::debug!(%error, "failed to reap clang-repl");
        }
    }
}

impl Drop for ClangRepl {
    fn drop(&mut self) {
        self.close_case();
    }
}

// ── Pure helpers ───────────────────────────────────────────────────

/// Interpreter arguments: one `--Xcc=-I<dir>` per include dir, then the
/// configured extras.
fn command_args(options: &ClangReplOptions, include_dirs: &[impl AsRef<Path>]) -> Vec<String> {
    include_dirs
        .iter()
        .map(|dir| format!("--Xcc=-I{}", dir.as_ref().display()))
        .chain(options.args.iter().cloned())
        .collect()
}

/// Statements that prepare a fresh context for a case.
fn seed_statements(seed: &CaseSeed) -> Vec<String> {
    let mut statements = vec![
        format!("%lib {}", seed.library.display()),
        "#include <cstdio>".to_string(),
    ];
    if let Some(header) = &seed.header {
        statements.push(format!("#include \"{}\"", header.display()));
    }
    statements
}

fn sentinel(pid: u32, fence: u64) -> String {
    format!("{SENTINEL_PREFIX}{pid}_{fence}__")
}

/// The fence is assembled by `printf` so the echoed source never contains
/// the sentinel itself.
fn fence_statement(pid: u32, fence: u64) -> String {
    format!(
        "fflush(stdout); printf(\"{SENTINEL_PREFIX}%u_%llu__\\n\", {pid}u, {fence}ull); fflush(stdout); \
         fprintf(stderr, \"{SENTINEL_PREFIX}%u_%llu__\\n\", {pid}u, {fence}ull); fflush(stderr);"
    )
}

/// The interpreter evaluates each input line on its own, so a continued
/// statement is sent joined on one line.
fn single_line(statement: &str) -> String {
    statement
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove every prompt the interpreter printed at the start of `line`.
fn strip_prompts<'a>(line: &'a str, prompt: &str) -> &'a str {
    let prompt_word = prompt.trim_end();
    let mut rest = line;
    loop {
        if !prompt.is_empty()
            && let Some(stripped) = rest.strip_prefix(prompt)
        {
            rest = stripped;
        } else if !prompt_word.is_empty() && rest == prompt_word {
            return "";
        } else {
            return rest;
        }
    }
}

/// Remove prompts the interpreter printed after unterminated output, as in
/// `5clang-repl> ` when a statement printed `5` without a newline.
fn strip_trailing_prompts<'a>(text: &'a str, prompt: &str) -> &'a str {
    let prompt_word = prompt.trim_end();
    let mut rest = text;
    loop {
        if !prompt.is_empty()
            && let Some(stripped) = rest.strip_suffix(prompt)
        {
            rest = stripped;
        } else if !prompt_word.is_empty()
            && let Some(stripped) = rest.strip_suffix(prompt_word)
        {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// Split one raw line at the sentinel: the prompt-stripped text before it
/// and whether the sentinel was present.
fn split_at_sentinel<'a>(line: &'a str, sentinel: &str, prompt: &str) -> (&'a str, bool) {
    let stripped = strip_prompts(line, prompt);
    match stripped.split_once(sentinel) {
        Some((before, _)) => (strip_trailing_prompts(strip_prompts(before, prompt), prompt), true),
        None => (stripped, false),
    }
}

fn compile_error(stderr: &[String]) -> Option<String> {
    stderr
        .iter()
        .any(|line| line.contains("error:"))
        .then(|| stderr.join("\n"))
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    timeout: Duration,
}

impl Deadline {
    fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
            timeout,
        }
    }
}

fn read_until_sentinel(
    lines: &Receiver<String>,
    sentinel: &str,
    prompt: &str,
    deadline: Deadline,
) -> Result<Vec<String>, BackendError> {
    let mut captured = Vec::new();
    loop {
        let remaining = deadline.at.saturating_duration_since(Instant::now());
        match lines.recv_timeout(remaining) {
            Ok(line) => {
                let (text, done) = split_at_sentinel(&line, sentinel, prompt);
                if done {
                    if !text.is_empty() {
                        captured.push(text.to_string());
                    }
                    return Ok(captured);
                }
                captured.push(text.to_string());
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(BackendError::Timeout {
                    secs: deadline.timeout.as_secs(),
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(BackendError::Terminated(
                    "interpreter exited before the statement completed".to_string(),
                ));
            }
        }
    }
}

fn forward_lines(pipe: impl Read + Send + 'static) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(pipe).lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
