//! The `about` command - print the documentation of one entry.

use std::process::ExitCode;

use mathsolve::lookup_doc;

use crate::cli::AboutArgs;

pub fn run(args: AboutArgs) -> ExitCode {
    match lookup_doc(&args.name) {
        Some(doc) => {
            println!("{doc}");
            ExitCode::SUCCESS
        }
        None => {
            println!("Unknown function {}", args.name.trim().to_lowercase());
            ExitCode::FAILURE
        }
    }
}
