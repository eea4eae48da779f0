//! Subcommand implementations.

pub mod about;
pub mod batch;
pub mod eval;
pub mod list;
pub mod repl;
