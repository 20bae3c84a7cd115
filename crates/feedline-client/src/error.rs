//! Error types for the API clients.
//!
//! Every failure surfaces as a human-readable, typed error; nothing is
//! silently swallowed, and every variant leaves the caller free to retry.

use feedline_core::GraphqlParseError;
use thiserror::Error;

/// Errors from the REST client and the query console dispatch.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, or
    /// body decode failure inside the HTTP stack).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text, if readable.
        message: String,
    },

    /// The console query could not be recognized or its variables bound.
    #[error(transparent)]
    Query(#[from] GraphqlParseError),

    /// Shaping a response payload failed.
    #[error("encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    /// Returns true if this error is transient and may succeed on retry.
    ///
    /// Network failures and server-side (5xx) statuses are transient.
    /// Client-side statuses and query parse failures are not; retrying the
    /// identical request cannot help.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Query(_) | Self::Encode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient_client_errors_are_not() {
        assert!(ApiError::Status { status: 503, message: String::new() }.is_transient());
        assert!(!ApiError::Status { status: 404, message: String::new() }.is_transient());
        assert!(!ApiError::Query(GraphqlParseError::UnrecognizedQuery).is_transient());
    }
}
