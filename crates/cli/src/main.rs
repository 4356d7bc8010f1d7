//! `taskrank` command line interface.
//!
//! Reads a JSON batch of tasks, ranks it and writes the result as JSON to
//! stdout. Diagnostics and logs go to stderr.

#![allow(clippy::print_stdout)]

mod cli;
mod commands;
mod errors;
mod tracing;

use crate::cli::parse;
use crate::commands::Command;
use crate::tracing::TracingConfig;

fn main() -> miette::Result<()> {
    let cli = parse();

    crate::tracing::init_tracing(TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        filter: cli.log_filter.clone(),
    })?;

    let config = commands::load_config(cli.config.as_deref())?;
    let command: Command = cli.command.into();

    let span = crate::command_span!(command.name());
    let output = span.in_scope(|| execute_command(&command, &config))?;

    println!("{output}");
    Ok(())
}

fn execute_command(command: &Command, config: &taskrank_core::Config) -> miette::Result<String> {
    match command {
        Command::Analyze(request) => commands::analyze::execute_analyze(request, config),
        Command::Suggest { request, limit } => {
            commands::suggest::execute_suggest(request, *limit, config)
        }
    }
}
