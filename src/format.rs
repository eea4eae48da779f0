//! Number formatting for answers.

use crate::config::OutputConfig;

/// Largest magnitude printed in positional notation.
const POSITIONAL_LIMIT: f64 = 1e15;

/// Format a number for display, with thousand separators when enabled.
pub fn format_display(value: f64, output: &OutputConfig) -> String {
    let raw = format_raw(value, output.max_decimals);
    if !output.thousands_separator || value.abs() >= POSITIONAL_LIMIT {
        return raw;
    }

    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, dec_part) = match unsigned.find('.') {
        Some(dot_pos) => unsigned.split_at(dot_pos),
        None => (unsigned, ""),
    };

    format!("{sign}{}{dec_part}", format_with_separators(int_part))
}

/// Format a number without separators, trimming trailing zeros.
pub fn format_raw(value: f64, max_decimals: usize) -> String {
    if value.abs() >= POSITIONAL_LIMIT {
        return format!("{value:e}");
    }
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }

    let formatted = format!("{value:.max_decimals$}");
    // with no decimals there is no fraction to trim
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };
    // -0.0000000001 rounds to "-0"
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Insert a comma between every group of three digits.
fn format_with_separators(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
