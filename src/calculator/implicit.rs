//! Implicit multiplication.
//!
//! Writes out the `*` implied by adjacency, so `2pi` becomes `2*pi` and
//! `(1+2)3` becomes `(1+2)*3`. The rewrite edits the caller's text in place,
//! which keeps its spacing for the echoed query.

use tracing::debug;

use super::error::SolveError;
use super::lexer::{TokenKind, tokenize};
use super::registry::Registry;

/// Insert an explicit `*` wherever two operands touch.
///
/// A `*` is inserted:
/// - between a numeral and a following constant or function name,
/// - between a numeral and a following `(`,
/// - between a `)` and a following numeral or name.
///
/// `)(` is left alone; the brace check rejects it.
pub fn insert_implicit_multiplication(
    query: &str,
    registry: &Registry,
) -> Result<String, SolveError> {
    let tokens = tokenize(query)?;

    let cuts: Vec<usize> = tokens
        .windows(2)
        .filter(|pair| match (&pair[0].kind, &pair[1].kind) {
            (TokenKind::Number(_), TokenKind::Name(name)) => registry.is_name(name),
            (TokenKind::Number(_), TokenKind::LParen) => true,
            (TokenKind::RParen, TokenKind::Number(_) | TokenKind::Name(_)) => true,
            _ => false,
        })
        .map(|pair| pair[0].span.end)
        .collect();

    if cuts.is_empty() {
        return Ok(query.to_string());
    }

    let mut out = String::with_capacity(query.len() + cuts.len());
    let mut last = 0;
    for cut in cuts {
        out.push_str(&query[last..cut]);
        out.push('*');
        last = cut;
    }
    out.push_str(&query[last..]);

    debug!(query, rewritten = %out, "inserted implicit multiplication");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(query: &str) -> String {
        insert_implicit_multiplication(query, Registry::global()).unwrap()
    }

    #[test]
    fn test_numeral_before_name() {
        assert_eq!(rewrite("2pi"), "2*pi");
        assert_eq!(rewrite("3sin(1)"), "3*sin(1)");
        assert_eq!(rewrite("2e+1"), "2*e+1");
        assert_eq!(rewrite("3log100(10)"), "3*log100(10)");
    }

    #[test]
    fn test_unknown_names_are_left_alone() {
        assert_eq!(rewrite("2x"), "2x");
    }

    #[test]
    fn test_close_paren_before_operand() {
        assert_eq!(rewrite("(1+2)3"), "(1+2)*3");
        assert_eq!(rewrite("sin(1)2"), "sin(1)*2");
        assert_eq!(rewrite("(2)pi"), "(2)*pi");
        assert_eq!(rewrite("(1).5"), "(1)*.5");
    }

    #[test]
    fn test_numeral_before_group() {
        assert_eq!(rewrite("2(3+4)"), "2*(3+4)");
    }

    #[test]
    fn test_spacing_is_kept() {
        assert_eq!(rewrite("2 pi + 1"), "2* pi + 1");
        assert_eq!(rewrite("2 + 3 * 4"), "2 + 3 * 4");
    }

    #[test]
    fn test_symbols_never_get_a_star() {
        assert_eq!(rewrite("5!"), "5!");
        assert_eq!(rewrite("5!!"), "5!!");
        assert_eq!(rewrite("2**3"), "2**3");
    }

    #[test]
    fn test_adjacent_groups_untouched() {
        assert_eq!(rewrite("(1)(2)"), "(1)(2)");
    }
}
