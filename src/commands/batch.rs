//! The `batch` command - solve many queries concurrently.
//!
//! Each query runs on tokio's blocking pool, capped at `--jobs` threads.
//! Answers are printed in input order.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use futures::future::join_all;
use mathsolve::{Evaluator, Solution, SolveError};
use tracing::debug;

use crate::cli::BatchArgs;
use crate::config::Config;
use crate::reply::Reply;

pub fn run(args: BatchArgs, config: &Config) -> Result<ExitCode> {
    let input = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };

    let queries: Vec<String> = input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .max_blocking_threads(args.jobs.max(1))
        .build()
        .context("Failed to start the batch runtime")?;

    let outcomes = runtime.block_on(solve_all(Evaluator::default(), &queries))?;

    let mut failures = 0;
    for (query, outcome) in queries.iter().zip(outcomes) {
        let reply = Reply::new(query, outcome, &config.output);
        if !reply.is_success() {
            failures += 1;
        }
        println!("{}", reply.render(&config.output));
    }

    debug!(total = queries.len(), failures, "batch finished");
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Solve every query on the blocking pool, keeping input order.
async fn solve_all(
    evaluator: Evaluator,
    queries: &[String],
) -> Result<Vec<Result<Solution, SolveError>>> {
    let handles = queries.iter().cloned().map(|query| {
        tokio::task::spawn_blocking(move || evaluator.solve(&query))
    });

    join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.context("Evaluation task failed"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_all_keeps_order() {
        let queries: Vec<String> = ["1+1", "(1", "5!", "2pi"]
            .into_iter()
            .map(String::from)
            .collect();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .max_blocking_threads(2)
            .build()
            .unwrap();
        let outcomes = runtime
            .block_on(solve_all(Evaluator::default(), &queries))
            .unwrap();

        assert_eq!(outcomes[0].as_ref().unwrap().value, 2.0);
        assert_eq!(outcomes[1], Err(SolveError::BracesMismatch));
        assert_eq!(outcomes[2].as_ref().unwrap().value, 120.0);
        assert_eq!(outcomes[3].as_ref().unwrap().pretty, "2*pi");
    }
}
