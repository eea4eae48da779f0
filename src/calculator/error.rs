//! Error kinds produced by the solver.
//!
//! The `Display` text of every variant is the message shown to the end user.

use thiserror::Error;

/// Terminal outcome of a `solve` call that did not produce a value.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolveError {
    /// Unbalanced parentheses or an empty `)(` group.
    #[error("Wrong braces count")]
    BracesMismatch,

    /// The evaluation ran past its deadline.
    #[error("You have a syntax error or computation took way longer than expected!")]
    Timeout,

    /// A finite computation produced a value outside the `f64` range.
    #[error("Result is too big to handle")]
    Overflow,

    /// An operand outside the domain of the operation.
    #[error("{0}")]
    NumericDomain(String),

    /// Input that cannot be turned into a single number.
    #[error("{0}")]
    Malformed(String),
}

impl SolveError {
    pub(crate) fn domain(message: impl Into<String>) -> Self {
        Self::NumericDomain(message.into())
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Stable tag for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BracesMismatch => "braces_mismatch",
            Self::Timeout => "timeout",
            Self::Overflow => "overflow",
            Self::NumericDomain(_) => "numeric_domain",
            Self::Malformed(_) => "malformed",
        }
    }
}
