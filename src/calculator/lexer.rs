//! Tokenizer shared by the preprocessor and the evaluator.
//!
//! Every token keeps the byte span it was read from so the preprocessor can
//! rewrite the caller's text in place instead of re-rendering it.

use std::fmt;
use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use super::error::SolveError;

lazy_static! {
    /// A `logN` head whose integral base may continue with a fractional part.
    static ref LOG_BASE_HEAD: Regex = Regex::new(r"^log[0-9]+$").unwrap();
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    Power,
    Bang,
    DoubleBang,
    Comma,
    LParen,
    RParen,
}

impl TokenKind {
    /// Binary arithmetic symbols (`+ - * / **`).
    pub fn is_infix(&self) -> bool {
        matches!(
            self,
            Self::Plus | Self::Minus | Self::Star | Self::Slash | Self::Power
        )
    }

    /// Literal text of a symbol token, `None` for numbers and names.
    pub fn symbol(&self) -> Option<&'static str> {
        Some(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Power => "**",
            Self::Bang => "!",
            Self::DoubleBang => "!!",
            Self::Comma => ",",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::Number(_) | Self::Name(_) => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Name(name) => f.write_str(name),
            other => f.write_str(other.symbol().unwrap_or_default()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range in the text the token was read from.
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }
}

/// Render tokens back to space-separated text, used in error messages.
pub fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.kind.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split `input` into tokens. Whitespace separates tokens and is dropped.
pub fn tokenize(input: &str) -> Result<Vec<Token>, SolveError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == b'.' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            let text = &input[start..i];
            let value: f64 = text.parse().map_err(|_| {
                SolveError::malformed(format!("could not convert string to float: '{text}'"))
            })?;
            if value.is_infinite() {
                return Err(SolveError::Overflow);
            }
            tokens.push(Token::new(TokenKind::Number(value), start..i));
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            // log2.5(8): the base of a logN call may be fractional
            if LOG_BASE_HEAD.is_match(&input[start..i])
                && bytes.get(i) == Some(&b'.')
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
            {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            tokens.push(Token::new(
                TokenKind::Name(input[start..i].to_string()),
                start..i,
            ));
            continue;
        }

        let (kind, len) = match (c, bytes.get(i + 1)) {
            (b'*', Some(b'*')) => (TokenKind::Power, 2),
            (b'!', Some(b'!')) => (TokenKind::DoubleBang, 2),
            (b'*', _) => (TokenKind::Star, 1),
            (b'!', _) => (TokenKind::Bang, 1),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'/', _) => (TokenKind::Slash, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            _ => {
                let ch = input[i..].chars().next().unwrap_or_default();
                return Err(SolveError::malformed(format!(
                    "unexpected character '{ch}'"
                )));
            }
        };
        tokens.push(Token::new(kind, i..i + len));
        i += len;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_numbers_and_symbols() {
        assert_eq!(
            kinds("2 ** 3.5 * .5"),
            vec![
                TokenKind::Number(2.0),
                TokenKind::Power,
                TokenKind::Number(3.5),
                TokenKind::Star,
                TokenKind::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_factorial_tokens() {
        assert_eq!(
            kinds("5!!"),
            vec![TokenKind::Number(5.0), TokenKind::DoubleBang]
        );
        assert_eq!(kinds("5!"), vec![TokenKind::Number(5.0), TokenKind::Bang]);
    }

    #[test]
    fn test_names_split_from_numerals() {
        assert_eq!(
            kinds("2pi"),
            vec![TokenKind::Number(2.0), TokenKind::Name("pi".into())]
        );
        assert_eq!(
            kinds("log100(10)"),
            vec![
                TokenKind::Name("log100".into()),
                TokenKind::LParen,
                TokenKind::Number(10.0),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_fractional_log_base() {
        assert_eq!(kinds("log2.5(x)")[0], TokenKind::Name("log2.5".into()));
        // only logN heads absorb a dot
        assert_eq!(
            kinds("sin1.5")[..2],
            [TokenKind::Name("sin1".into()), TokenKind::Number(0.5)]
        );
    }

    #[test]
    fn test_spans_point_into_input() {
        let tokens = tokenize("sin( 1 )").unwrap();
        assert_eq!(tokens[0].span, 0..3);
        assert_eq!(tokens[2].span, 5..6);
        assert_eq!(tokens[3].span, 7..8);
    }

    #[test]
    fn test_bad_numeral() {
        assert_eq!(
            tokenize("1.2.3"),
            Err(SolveError::malformed(
                "could not convert string to float: '1.2.3'"
            ))
        );
    }

    #[test]
    fn test_numeral_out_of_range() {
        assert_eq!(tokenize(&"9".repeat(400)), Err(SolveError::Overflow));
    }

    #[test]
    fn test_unexpected_character() {
        assert_eq!(
            tokenize("2 % 3"),
            Err(SolveError::malformed("unexpected character '%'"))
        );
    }

    #[test]
    fn test_render_separates_tokens() {
        let tokens = tokenize("1+2 **3").unwrap();
        assert_eq!(render(&tokens), "1 + 2 ** 3");
        assert_eq!(render(&tokenize("(1) (2)").unwrap()), "( 1 ) ( 2 )");
    }
}
