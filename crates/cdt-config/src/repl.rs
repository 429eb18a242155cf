//! `[repl]`: how the C++ interpreter is launched.

use serde::{Deserialize, Serialize};

fn default_binary() -> String {
    "clang-repl".to_string()
}

fn default_prompt() -> String {
    "clang-repl> ".to_string()
}

const fn default_statement_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReplConfig {
    /// Interpreter executable name or path.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Extra interpreter arguments, e.g. `--Xcc=-std=c++20`.
    #[serde(default)]
    pub args: Vec<String>,

    /// Prompt stripped from captured output.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Seconds a single statement may run before its case is abandoned.
    #[serde(default = "default_statement_timeout_secs")]
    pub statement_timeout_secs: u64,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            args: Vec::new(),
            prompt: default_prompt(),
            statement_timeout_secs: default_statement_timeout_secs(),
        }
    }
}
