//! Reduction of a flat token run to a single number.

use tracing::trace;

use super::deadline::Deadline;
use super::error::SolveError;
use super::lexer::{Token, TokenKind, render};
use super::registry::{Occurrence, Registry};

/// Reduce a run of tokens that contains no parentheses.
///
/// Each pass walks the registry in priority order and substitutes the first
/// application it finds, then starts over from the top. Reduction stops when
/// no entry matches; anything other than one number left at that point is
/// malformed input.
pub fn reduce(
    tokens: &[Token],
    registry: &Registry,
    deadline: &Deadline,
) -> Result<f64, SolveError> {
    let mut tokens = tokens.to_vec();

    'scan: loop {
        deadline.check()?;

        for spec in registry.entries() {
            let Some(Occurrence { span, args }) = spec.detect(&tokens) else {
                continue;
            };

            let value = spec.apply(&args)?;
            trace!(operator = spec.token, ?args, value, "reduced");

            let bytes = tokens[span.start].span.start..tokens[span.end - 1].span.end;
            tokens.splice(span, [Token::new(TokenKind::Number(value), bytes)]);
            continue 'scan;
        }

        break;
    }

    match tokens.as_slice() {
        [Token { kind: TokenKind::Number(value), .. }] => Ok(*value),
        [] => Err(SolveError::malformed("empty expression")),
        rest => Err(leftover(rest, registry)),
    }
}

fn leftover(tokens: &[Token], registry: &Registry) -> SolveError {
    let name = tokens.iter().find_map(|t| match &t.kind {
        TokenKind::Name(name) => Some(name.as_str()),
        _ => None,
    });

    match name {
        Some(name) if registry.is_name(name) => {
            SolveError::malformed(format!("'{name}' needs an argument list"))
        }
        Some(name) => SolveError::malformed(format!("unknown name '{name}'")),
        None => SolveError::malformed(format!("cannot evaluate '{}'", render(tokens))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::deadline::DEFAULT_TIMEOUT;
    use crate::calculator::lexer::tokenize;
    use std::time::Duration;

    fn eval(query: &str) -> Result<f64, SolveError> {
        let tokens = tokenize(query).unwrap();
        reduce(&tokens, Registry::global(), &Deadline::start(DEFAULT_TIMEOUT))
    }

    #[test]
    fn test_single_numeral_is_unchanged() {
        assert_eq!(eval("42"), Ok(42.0));
    }

    #[test]
    fn test_precedence_by_registration_order() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
        assert_eq!(eval("2**3**2"), Ok(64.0));
        // multiplication is tried before division
        assert_eq!(eval("8/2*2"), Ok(2.0));
        // addition is tried before subtraction
        assert_eq!(eval("1-2+3"), Ok(-4.0));
        assert_eq!(eval("10-2-3"), Ok(5.0));
    }

    #[test]
    fn test_negation_tier() {
        assert_eq!(eval("-2**2"), Ok(-4.0));
        assert_eq!(eval("2*-3"), Ok(-6.0));
        assert_eq!(eval("2**-1"), Ok(0.5));
        assert_eq!(eval("5--3"), Ok(8.0));
        assert_eq!(eval("-3!"), Ok(-6.0));
    }

    #[test]
    fn test_constants_and_postfix() {
        assert_eq!(eval("pi"), Ok(std::f64::consts::PI));
        assert_eq!(eval("5!"), Ok(120.0));
        assert_eq!(eval("5!!"), Ok(15.0));
        assert_eq!(eval("3!+1"), Ok(7.0));
    }

    #[test]
    fn test_leftovers_are_malformed() {
        assert_eq!(eval(""), Err(SolveError::malformed("empty expression")));
        assert_eq!(eval("1+"), Err(SolveError::malformed("cannot evaluate '1 +'")));
        assert_eq!(eval("2x"), Err(SolveError::malformed("unknown name 'x'")));
        assert_eq!(
            eval("sin"),
            Err(SolveError::malformed("'sin' needs an argument list"))
        );
    }

    #[test]
    fn test_errors_propagate() {
        assert_eq!(
            eval("1/0"),
            Err(SolveError::domain("float division by zero"))
        );
        assert_eq!(eval("10**400"), Err(SolveError::Overflow));
    }

    #[test]
    fn test_deadline_is_checked() {
        let tokens = tokenize("1+1").unwrap();
        assert_eq!(
            reduce(&tokens, Registry::global(), &Deadline::start(Duration::ZERO)),
            Err(SolveError::Timeout)
        );
    }
}
