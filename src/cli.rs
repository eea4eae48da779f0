//! Command-line interface definitions.
//!
//! Only clap structs live here; the commands are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

/// mathsolve - solve free-form arithmetic queries
#[derive(Parser, Debug)]
#[command(name = "mathsolve", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: <config dir>/mathsolve/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format, overriding the config file
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Log evaluation steps to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve a single query
    Eval(EvalArgs),

    /// List the available operators and functions
    List,

    /// Describe one operator or function
    About(AboutArgs),

    /// Answer queries read line by line from stdin
    Repl,

    /// Solve every line of a file concurrently
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Query to solve, e.g. "2pi + log100(10)"
    pub query: String,
}

#[derive(Args, Debug)]
pub struct AboutArgs {
    /// Operator or function name, e.g. "logN" or "**"
    pub name: String,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Input file, one query per line (default: stdin)
    pub file: Option<PathBuf>,

    /// Queries evaluated at the same time
    #[arg(short, long, default_value_t = 4)]
    pub jobs: usize,
}
