use serde::{Deserialize, Serialize};

/// One statement of a doctest and the output it is expected to print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestLine {
    pub cmd: String,
    pub outputs: Vec<String>,
    /// `None` until the line has been executed.
    pub is_pass: Option<bool>,
    /// Captured output lines, once executed.
    pub actual: Option<Vec<String>>,
    /// Backend diagnostic for compile/runtime failures.
    pub diagnostic: Option<String>,
}

impl TestLine {
    #[must_use]
    pub fn new(cmd: impl Into<String>, outputs: Vec<String>) -> Self {
        Self {
            cmd: cmd.into(),
            outputs,
            is_pass: None,
            actual: None,
            diagnostic: None,
        }
    }

    /// Record the captured output and whether it matched.
    pub fn record_output(&mut self, actual: Vec<String>, is_pass: bool) {
        self.actual = Some(actual);
        self.is_pass = Some(is_pass);
    }

    /// Record a statement that failed to compile or run.
    pub fn record_failure(&mut self, diagnostic: impl Into<String>) {
        self.is_pass = Some(false);
        self.diagnostic = Some(diagnostic.into());
    }

    /// Forget any previous execution result.
    pub fn reset(&mut self) {
        self.is_pass = None;
        self.actual = None;
        self.diagnostic = None;
    }
}

/// The ordered statements extracted from one comment body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub lines: Vec<TestLine>,
    /// Logical AND over the lines, set by [`aggregate`](Self::aggregate).
    pub is_pass: Option<bool>,
}

impl TestCase {
    #[must_use]
    pub const fn new(lines: Vec<TestLine>) -> Self {
        Self {
            lines,
            is_pass: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Recompute `is_pass` from the lines. Unexecuted lines count as failing.
    pub fn aggregate(&mut self) -> bool {
        let pass = self.lines.iter().all(|line| line.is_pass == Some(true));
        self.is_pass = Some(pass);
        pass
    }

    pub fn reset(&mut self) {
        self.is_pass = None;
        for line in &mut self.lines {
            line.reset();
        }
    }
}
