//! The `eval` command - solve one query.

use std::process::ExitCode;

use mathsolve::solve;

use crate::cli::EvalArgs;
use crate::config::Config;
use crate::reply::Reply;

pub fn run(args: EvalArgs, config: &Config) -> ExitCode {
    let reply = Reply::new(&args.query, solve(&args.query), &config.output);
    println!("{}", reply.render(&config.output));

    if reply.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
