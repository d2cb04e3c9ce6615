use std::time::Duration;

use thiserror::Error;

/// Detail used when a successful response carries no answer.
pub const NO_RESPONSE_DATA: &str = "No response data received";

/// Detail used when a successful response is not declared as JSON.
pub const NON_JSON_RESPONSE: &str = "Server returned non-JSON response";

/// Detail used when a successful response claims JSON but does not parse.
pub const MALFORMED_RESPONSE: &str = "Server returned malformed JSON";

/// Detail used for a JSON error body without a `detail` field.
pub const UNKNOWN_ERROR_DETAIL: &str = "Unknown error";

/// Detail used for an error response with an empty body.
pub const SERVER_ERROR_DETAIL: &str = "Server error";

/// Errors from a single query round-trip.
///
/// The `Display` output is the user-facing detail that gets embedded in the
/// assistant's apology turn, so it stays free of internal noise. Transport
/// reasons are kept in the variant for logging only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Network error: unable to reach the query service")]
    Transport { reason: String },

    #[error("{detail}")]
    Status { status: u16, detail: String },

    #[error("{0}")]
    Protocol(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Request was cancelled")]
    Cancelled,
}

impl QueryError {
    pub fn transport(reason: impl Into<String>) -> Self {
        QueryError::Transport {
            reason: reason.into(),
        }
    }

    pub fn protocol(detail: impl Into<String>) -> Self {
        QueryError::Protocol(detail.into())
    }

    /// Short machine-friendly label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Transport { .. } => "transport",
            QueryError::Status { .. } => "status",
            QueryError::Protocol(_) => "protocol",
            QueryError::Timeout(_) => "timeout",
            QueryError::Cancelled => "cancelled",
        }
    }
}
