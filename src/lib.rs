//! Free-form arithmetic query solver.
//!
//! ```
//! let solution = mathsolve::solve("2(1+2)!").unwrap();
//! assert_eq!(solution.value, 12.0);
//! assert_eq!(solution.pretty, "2*(1+2)!");
//! ```

pub mod calculator;

pub use calculator::{Evaluator, Solution, SolveError, list_operators, lookup_doc, solve};
