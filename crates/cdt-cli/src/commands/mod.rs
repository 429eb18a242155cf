use std::process::ExitCode;

use cdt_config::CdtConfig;
use cdt_runner::Session;

use crate::bootstrap;
use crate::cli::{Commands, GlobalFlags};

pub mod list;
pub mod run;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, config: &CdtConfig, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let mut session = Session::with_clang_repl(
        bootstrap::parse_options(config),
        bootstrap::repl_options(config),
    );

    let code = match command {
        Commands::List(args) => list::handle(&args, &mut session, config, flags)?,
        Commands::Run(args) => run::handle(&args, &mut session, config, flags)?,
    };
    session.shutdown();
    Ok(code)
}
