//! The `repl` command - answer queries read from stdin.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use mathsolve::solve;

use crate::config::Config;
use crate::reply::Reply;

pub fn run(config: &Config) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let query = line.trim();
        if query.is_empty() {
            continue;
        }

        let reply = Reply::new(query, solve(query), &config.output);
        writeln!(stdout, "{}", reply.render(&config.output)).context("Failed to write answer")?;
        stdout.flush().context("Failed to write answer")?;
    }

    Ok(())
}
