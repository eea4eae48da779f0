//! Answer rendering for solved (or failed) queries.

use mathsolve::{Solution, SolveError};
use serde::Serialize;

use crate::config::{OutputConfig, OutputFormat};
use crate::format::{format_display, format_raw};

/// Answer to one query.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    /// The query produced a number.
    Success {
        /// The query as received.
        query: String,
        /// The query as it was evaluated.
        pretty: String,
        value: f64,
        /// Formatted for display.
        result: String,
    },
    /// The query failed with a user-facing message.
    Error {
        /// The query as received.
        query: String,
        kind: &'static str,
        message: String,
    },
}

impl Reply {
    pub fn new(query: &str, outcome: Result<Solution, SolveError>, output: &OutputConfig) -> Self {
        let query = query.to_string();
        match outcome {
            Ok(Solution { value, pretty }) => Self::Success {
                query,
                pretty,
                value,
                result: format_display(value, output),
            },
            Err(error) => Self::Error {
                query,
                kind: error.kind(),
                message: error.to_string(),
            },
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Plain value for piping, only for successful results.
    pub fn raw(&self, output: &OutputConfig) -> Option<String> {
        match self {
            Self::Success { value, .. } => Some(format_raw(*value, output.max_decimals)),
            Self::Error { .. } => None,
        }
    }

    /// Render in the configured output format.
    pub fn render(&self, output: &OutputConfig) -> String {
        match output.format {
            OutputFormat::Text => self.to_text(),
            OutputFormat::Json => self.to_json(),
        }
    }

    fn to_text(&self) -> String {
        match self {
            Self::Success { pretty, result, .. } => format!("Query: {pretty}\nResult: {result}"),
            Self::Error { message, .. } => message.clone(),
        }
    }

    fn to_json(&self) -> String {
        // Reply holds only strings and finite floats
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!("{{\"status\":\"error\",\"message\":\"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(query: &str) -> Reply {
        Reply::new(query, mathsolve::solve(query), &OutputConfig::default())
    }

    #[test]
    fn test_text_success() {
        let reply = answer("(1+2)3");
        assert!(reply.is_success());
        assert_eq!(reply.to_text(), "Query: (1+2)*3\nResult: 9");
        assert_eq!(reply.raw(&OutputConfig::default()).as_deref(), Some("9"));
    }

    #[test]
    fn test_text_error_is_bare_message() {
        let reply = answer("(1+2");
        assert!(!reply.is_success());
        assert_eq!(reply.to_text(), "Wrong braces count");
        assert_eq!(reply.raw(&OutputConfig::default()), None);
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&answer("5!").to_json()).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["value"], 120.0);
        assert_eq!(json["result"], "120");

        let json: serde_json::Value = serde_json::from_str(&answer("10**400").to_json()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["kind"], "overflow");
        assert_eq!(json["message"], "Result is too big to handle");
    }
}
