//! Arithmetic query solver.
//!
//! This module provides functionality to:
//! - Rewrite implicit multiplication (`2pi`, `(1+2)3`) into explicit form
//! - Validate parentheses before any numeric work
//! - Evaluate the query innermost group first under a wall-clock deadline
//! - Describe the supported operators and functions

mod braces;
mod deadline;
mod error;
mod evaluation;
mod implicit;
mod lexer;
mod reduce;
mod registry;

pub use deadline::DEFAULT_TIMEOUT;
pub use error::SolveError;
pub use evaluation::{Evaluator, Solution, solve};
pub use registry::{
    Arity, Callee, Compute, Notation, Occurrence, OperatorSpec, Registry, list_operators,
    lookup_doc,
};
