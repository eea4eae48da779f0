//! Query evaluation.
//!
//! The driver resolves the innermost parenthesised groups one at a time,
//! preferring function calls, and splices each result back into the query
//! until nothing but a flat run of tokens is left for a final reduction.

use std::ops::Range;
use std::time::Duration;

use tracing::{debug, trace};

use super::braces::check_braces;
use super::deadline::{DEFAULT_TIMEOUT, Deadline};
use super::error::SolveError;
use super::implicit::insert_implicit_multiplication;
use super::lexer::{Token, TokenKind, tokenize};
use super::reduce::reduce;
use super::registry::Registry;

/// Value of a solved query together with the text echoed back to the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub value: f64,
    /// The query after case folding and implicit multiplication.
    pub pretty: String,
}

/// Solve `query` with the process-wide registry and the default deadline.
pub fn solve(query: &str) -> Result<Solution, SolveError> {
    Evaluator::default().solve(query)
}

/// Evaluates queries against a registry under a wall-clock budget.
///
/// Holds no per-call state, so one evaluator can serve any number of threads.
#[derive(Clone, Copy)]
pub struct Evaluator {
    registry: &'static Registry,
    timeout: Duration,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(Registry::global())
    }
}

impl Evaluator {
    pub fn new(registry: &'static Registry) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn solve(&self, query: &str) -> Result<Solution, SolveError> {
        let deadline = Deadline::start(self.timeout);

        let folded = query.trim().to_lowercase();
        // inserted `*` never touches a parenthesis, so the raw text decides
        check_braces(&folded)?;
        let pretty = insert_implicit_multiplication(&folded, self.registry)?;

        let value = self.descend(&pretty, &deadline)?;
        debug!(query = %folded, value, "solved");
        Ok(Solution { value, pretty })
    }

    fn descend(&self, query: &str, deadline: &Deadline) -> Result<f64, SolveError> {
        let mut tokens = tokenize(query)?;

        loop {
            deadline.check()?;

            let groups = innermost_groups(&tokens);
            let call = groups.iter().find_map(|group| {
                let before = group.start.checked_sub(1).and_then(|i| tokens.get(i))?;
                match &before.kind {
                    TokenKind::Name(name) => Some((group.clone(), name.clone())),
                    _ => None,
                }
            });

            let (replaced, value) = if let Some((group, name)) = call {
                let value = self.call(&name, &tokens[group.start + 1..group.end - 1], deadline)?;
                (group.start - 1..group.end, value)
            } else if let Some(group) = groups.first() {
                let inner = &tokens[group.start + 1..group.end - 1];
                if inner.is_empty() {
                    return Err(SolveError::malformed("empty group"));
                }
                (group.clone(), reduce(inner, self.registry, deadline)?)
            } else {
                return reduce(&tokens, self.registry, deadline);
            };

            trace!(group = ?replaced, value, "resolved group");
            let bytes = tokens[replaced.start].span.start..tokens[replaced.end - 1].span.end;
            tokens.splice(replaced, [Token::new(TokenKind::Number(value), bytes)]);
        }
    }

    /// Evaluate `name(args)` where `args` holds no parentheses.
    fn call(&self, name: &str, args: &[Token], deadline: &Deadline) -> Result<f64, SolveError> {
        let callee = self
            .registry
            .callee(name)
            .ok_or_else(|| SolveError::malformed(format!("unknown function '{name}'")))?;

        let values = if args.is_empty() {
            Vec::new()
        } else {
            args.split(|t| t.kind == TokenKind::Comma)
                .map(|arg| reduce(arg, self.registry, deadline))
                .collect::<Result<Vec<_>, _>>()?
        };

        trace!(function = name, args = ?values, "calling");
        callee.call(&values)
    }
}

/// Token ranges of every `( ... )` pair with no parenthesis inside,
/// parentheses included, in query order.
fn innermost_groups(tokens: &[Token]) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut open = None;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LParen => open = Some(i),
            TokenKind::RParen => {
                if let Some(start) = open.take() {
                    groups.push(start..i + 1);
                }
            }
            _ => {}
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(query: &str) -> f64 {
        solve(query).unwrap().value
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_basic_evaluation() {
        assert_eq!(value("2 + 3 * 4"), 14.0);
        assert_eq!(value("(1+2)*(3+4)"), 21.0);
        assert_eq!(value("((2))"), 2.0);
    }

    #[test]
    fn test_pretty_text_is_preprocessed_query() {
        let solution = solve("  (1+2)3 ").unwrap();
        assert_eq!(solution.value, 9.0);
        assert_eq!(solution.pretty, "(1+2)*3");

        assert_eq!(solve("2 PI").unwrap().pretty, "2* pi");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_close(value("2pi"), 2.0 * std::f64::consts::PI);
        assert_eq!(value("(1+2)3"), 9.0);
        assert_eq!(value("2(3)"), 6.0);
        assert_close(value("sin(1)2"), 1f64.sin() * 2.0);
    }

    #[test]
    fn test_function_calls() {
        assert_close(value("log100(10)"), 0.5);
        assert_close(value("log(8, 2)"), 3.0);
        assert_close(value("log(e)"), 1.0);
        assert_close(value("sin(pi/2)"), 1.0);
        assert_close(value("atan2(1, 1)"), std::f64::consts::FRAC_PI_4);
        assert_close(value("cos(pi())"), -1.0);
        assert_close(value("sqrt(sqrt(16))"), 2.0);
        assert_close(value("log2.5(6.25)"), 2.0);
    }

    #[test]
    fn test_negative_call_argument() {
        assert_eq!(value("fabs(-3)"), 3.0);
        assert_eq!(value("2*(0-3)"), -6.0);
        assert_eq!(
            solve("log(-1)"),
            Err(SolveError::domain("math domain error"))
        );
    }

    #[test]
    fn test_factorial_of_group() {
        assert_eq!(value("(2+3)!"), 120.0);
        assert_eq!(
            solve("(0-3)!"),
            Err(SolveError::domain("factorial() not defined for negative values"))
        );
    }

    #[test]
    fn test_braces_checked_first() {
        assert_eq!(solve("(1+2"), Err(SolveError::BracesMismatch));
        assert_eq!(solve("(1)(2)"), Err(SolveError::BracesMismatch));
    }

    #[test]
    fn test_braces_win_over_lexer_errors() {
        assert_eq!(solve("(2 % 3"), Err(SolveError::BracesMismatch));
        assert_eq!(solve("(1.2.3"), Err(SolveError::BracesMismatch));
        assert_eq!(
            solve(&format!("({}", "9".repeat(400))),
            Err(SolveError::BracesMismatch)
        );
        assert_eq!(
            solve("2 % 3"),
            Err(SolveError::malformed("unexpected character '%'"))
        );
    }

    #[test]
    fn test_malformed_queries() {
        assert_eq!(solve("()"), Err(SolveError::malformed("empty group")));
        assert_eq!(
            solve("foo(1)"),
            Err(SolveError::malformed("unknown function 'foo'"))
        );
        assert_eq!(
            solve("sin()"),
            Err(SolveError::malformed(
                "sin() takes exactly one argument (0 given)"
            ))
        );
        assert_eq!(solve(""), Err(SolveError::malformed("empty expression")));
        assert_eq!(
            solve("(1) (2)"),
            Err(SolveError::malformed("cannot evaluate '1 2'"))
        );
    }

    #[test]
    fn test_lowered_deadline_times_out() {
        let evaluator = Evaluator::default().with_timeout(Duration::ZERO);
        assert_eq!(evaluator.solve("1+1"), Err(SolveError::Timeout));
    }

    #[test]
    fn test_long_query_is_cut_off() {
        let query = format!("{}1", "1+".repeat(20_000));
        let evaluator = Evaluator::default().with_timeout(Duration::from_millis(50));
        assert_eq!(evaluator.solve(&query), Err(SolveError::Timeout));
    }

    #[test]
    fn test_innermost_groups() {
        let tokens = tokenize("(1+(2))*sin(3)").unwrap();
        assert_eq!(innermost_groups(&tokens), vec![3..6, 9..12]);
    }
}
