//! mathsolve - command-line front end for the arithmetic query solver.

mod cli;
mod commands;
mod config;
mod format;
mod reply;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use cli::{Cli, Command};
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by RUST_LOG when set.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        config.output.format = format;
    }

    Ok(match cli.command {
        Command::Eval(args) => commands::eval::run(args, &config),
        Command::List => {
            commands::list::run(&config);
            ExitCode::SUCCESS
        }
        Command::About(args) => commands::about::run(args),
        Command::Repl => {
            commands::repl::run(&config)?;
            ExitCode::SUCCESS
        }
        Command::Batch(args) => commands::batch::run(args, &config)?,
    })
}
