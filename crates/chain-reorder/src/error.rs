//! Editor Errors
//!
//! Model violations and the two ways a request to the backend can fail.

use serde::Deserialize;
use thiserror::Error;

use crate::row::Rank;

/// Common result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors raised by the reorder model
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("rows belong to different chains: {0:?} and {1:?}")]
    MixedGroup(String, String),
    #[error("rank {0} appears more than once in the chain")]
    DuplicateRank(Rank),
    #[error("no row with rank {0} in this chain")]
    UnknownRow(Rank),
    #[error("no rule ID found for chain {0:?}")]
    MissingRuleId(String),
    #[error("invalid row: {0}")]
    InvalidRow(String),
    #[error("a reorder request is already in flight")]
    ApplyInFlight,
    #[error("order {order:?} is not a permutation of {original:?}")]
    BrokenPermutation { order: Vec<Rank>, original: Vec<Rank> },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Failure of a request sent to the backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApplyError {
    /// The request never got a response
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-2xx status
    #[error("server rejected the request with status {status}")]
    Rejected { status: u16, message: Option<String> },
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApplyError {
    /// Build a rejection from a response status and its raw body.
    ///
    /// JSON bodies contribute their `message` (or `error`) field, anything
    /// else is used as plain text. Blank bodies and markup (proxy error
    /// pages) carry no message.
    pub fn rejected(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.message.or(parsed.error),
            Err(_) if body.starts_with('<') => None,
            Err(_) => Some(body.to_string()),
        }
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

        ApplyError::Rejected { status, message }
    }

    /// Text shown to the user in the notification
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ApplyError::Rejected { message: Some(message), .. } => message.clone(),
            ApplyError::Rejected { status, message: None } => {
                format!("Failed to {} (HTTP {})", action, status)
            }
            ApplyError::Network(_) => {
                format!("Failed to {}: the server could not be reached", action)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_plain_text_body() {
        let err = ApplyError::rejected(409, "  task ranks are out of date\n");
        assert_eq!(
            err,
            ApplyError::Rejected { status: 409, message: Some("task ranks are out of date".into()) }
        );
        assert_eq!(err.user_message("reorder tasks"), "task ranks are out of date");
    }

    #[test]
    fn test_rejected_json_body() {
        let err = ApplyError::rejected(400, r#"{"error":"invalid task chain"}"#);
        assert_eq!(err.user_message("reorder tasks"), "invalid task chain");

        let err = ApplyError::rejected(400, r#"{"message":"bad ranks","error":"ignored"}"#);
        assert_eq!(err.user_message("reorder tasks"), "bad ranks");
    }

    #[test]
    fn test_rejected_without_message_is_generic() {
        let err = ApplyError::rejected(500, "   ");
        assert_eq!(err.user_message("reorder tasks"), "Failed to reorder tasks (HTTP 500)");

        let err = ApplyError::rejected(502, r#"{"detail":"x"}"#);
        assert_eq!(err.user_message("delete task"), "Failed to delete task (HTTP 502)");
    }

    #[test]
    fn test_rejected_html_page_is_generic() {
        let page = "<html><body><h1>502 Bad Gateway</h1></body></html>";
        let err = ApplyError::rejected(502, page);
        assert_eq!(err, ApplyError::Rejected { status: 502, message: None });
        assert_eq!(err.user_message("reorder tasks"), "Failed to reorder tasks (HTTP 502)");

        let err = ApplyError::rejected(503, "\n  <!DOCTYPE html><title>down</title>");
        assert_eq!(err.user_message("delete task"), "Failed to delete task (HTTP 503)");
    }

    #[test]
    fn test_network_message() {
        let err = ApplyError::Network("TypeError: Failed to fetch".into());
        assert!(err.user_message("reorder tasks").contains("could not be reached"));
    }
}
