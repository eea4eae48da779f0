//! Parenthesis validation, run before any numeric work.

use super::error::SolveError;

/// Reject unbalanced parentheses and `)(` pairs.
pub fn check_braces(query: &str) -> Result<(), SolveError> {
    if query.contains(")(") {
        return Err(SolveError::BracesMismatch);
    }

    let mut depth: i64 = 0;
    for c in query.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(SolveError::BracesMismatch);
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(SolveError::BracesMismatch);
    }
    Ok(())
}
