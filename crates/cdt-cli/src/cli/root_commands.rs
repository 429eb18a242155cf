use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List every doctest found in the inputs.
    List(InputArgs),
    /// Run doctests against the library under test.
    Run(RunArgs),
}

/// Where doctests and the library under test come from.
#[derive(Clone, Debug, Default, Args)]
pub struct InputArgs {
    /// Translation unit to scan (repeatable).
    #[arg(long = "source", value_name = "FILE")]
    pub sources: Vec<PathBuf>,

    /// Header to scan after the translation units (repeatable).
    #[arg(long = "header", value_name = "FILE")]
    pub headers: Vec<PathBuf>,

    /// Shared library to load, as a path or a bare name like `fac`.
    #[arg(long = "lib", value_name = "ARTIFACT")]
    pub lib: Option<PathBuf>,

    /// Extra include and library search directory (repeatable).
    #[arg(long = "include-dir", value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// CMake build directory to read targets from.
    #[arg(long, value_name = "DIR", requires = "cmake_target")]
    pub cmake_build_path: Option<PathBuf>,

    /// CMake target whose sources and library are used.
    #[arg(long, value_name = "NAME", requires = "cmake_build_path")]
    pub cmake_target: Option<String>,
}

#[derive(Clone, Debug, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Run only the doctest with this exact path (repeatable).
    #[arg(long = "testcase", value_name = "PATH")]
    pub testcases: Vec<String>,

    /// Stop a test case at its first failing statement.
    #[arg(long)]
    pub abort_on_failure: bool,
}
