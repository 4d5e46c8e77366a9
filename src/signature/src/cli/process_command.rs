use super::commands::{Cli, Command};
use super::handlers;
use crate::config::ConfigLoader;
use crate::logging::setup_logging;
use anyhow::{Context, Result};
use clap::Parser;
use tokio::runtime::Runtime;

fn runtime() -> Result<Runtime> {
    Runtime::new().context("Failed to start the tokio runtime")
}

/// Process the command line.
pub fn process_command() -> Result<()> {
    // NOTE: this exits the process if there is a parsing error
    let cli = Cli::parse();

    let config = ConfigLoader::load(cli.config.as_deref())?;
    setup_logging(
        &config.log_level,
        cli.log_file.as_deref().or(config.log_file.as_deref()),
    )?;

    match cli.command {
        Command::Extract { modules, json } => {
            runtime()?.block_on(handlers::extract(&config, &modules, json))
        }
        Command::Convert { input, output } => handlers::convert(&input, &output),
        Command::Match { rules, command } => handlers::match_command(&config, &rules, &command),
        Command::Check { rules, json } => handlers::check(&config, &rules, json),
        Command::Quality(args) => runtime()?.block_on(handlers::quality(&config, &args)),
    }
}
