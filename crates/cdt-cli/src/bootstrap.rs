//! Configuration loading and conversion into runtime options.

use std::time::Duration;

use anyhow::Context;
use cdt_config::CdtConfig;
use cdt_parser::ParseOptions;
use cdt_runner::ClangReplOptions;

/// Load `.env`, then the layered configuration.
pub fn load_config() -> anyhow::Result<CdtConfig> {
    CdtConfig::load_with_dotenv().context("failed to load cdoctest configuration")
}

pub fn parse_options(config: &CdtConfig) -> ParseOptions {
    ParseOptions {
        scope_policy: config.parse.scope_policy,
        tolerate_errors: config.parse.tolerate_errors,
        default_filename: config.parse.default_filename.clone(),
        marker: config.run.marker.clone(),
    }
}

pub fn repl_options(config: &CdtConfig) -> ClangReplOptions {
    ClangReplOptions {
        binary: config.repl.binary.clone(),
        args: config.repl.args.clone(),
        prompt: config.repl.prompt.clone(),
        statement_timeout: Duration::from_secs(config.repl.statement_timeout_secs),
    }
}
