use std::process::ExitCode;

use anyhow::Context;
use cdt_config::CdtConfig;
use cdt_core::FailurePolicy;
use cdt_runner::{RunReport, Session, VerifyRequest, verify};

use crate::cli::{GlobalFlags, RunArgs};
use crate::output::output;
use crate::pipeline::{build_worklist, resolve_inputs};

/// Handle `cdoctest run`.
pub fn handle(
    args: &RunArgs,
    session: &mut Session,
    config: &CdtConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let inputs = resolve_inputs(&args.input, &config.run.header_ext)?;
    let artifact = inputs
        .artifact
        .clone()
        .context("no library to load: pass --lib or a --cmake-target that builds a shared library")?;
    let module_name = inputs.module_name().unwrap_or_default();
    let mut worklist = build_worklist(session, &inputs, &config.run.marker)?;

    let request = VerifyRequest {
        artifact,
        search_dirs: inputs.search_dirs(),
        selected_paths: args.testcases.clone(),
        module_name,
        header_ext: config.run.header_ext.clone(),
        failure_policy: failure_policy(args.abort_on_failure, config.run.failure_policy),
    };
    let outcome = verify(session, &request, &mut worklist)?;

    let report = RunReport::from_worklist(&worklist).with_unmatched(outcome.unmatched_selections);
    output(&report, flags)?;

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// `--abort-on-failure` overrides the configured policy.
const fn failure_policy(abort_on_failure: bool, configured: FailurePolicy) -> FailurePolicy {
    if abort_on_failure {
        FailurePolicy::AbortCase
    } else {
        configured
    }
}
