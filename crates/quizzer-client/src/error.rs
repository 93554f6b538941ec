//! Error types for the Quizzer client.

use reqwest::StatusCode;
use serde::Deserialize;

/// A specialized `Result` type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors returned by [`crate::QuizClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Could not reach the quiz server: {0}\n\nSuggestion: Start it with `quizzer serve` or pass --server")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// The server's own error message, or a fallback for the operation.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("Unexpected response from server: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Builds an `Api` error from a failed response body.
    ///
    /// The server's `error` field is surfaced verbatim; when the body carries
    /// none, `fallback` is used instead.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str, fallback: &str) -> Self {
        #[derive(Deserialize)]
        struct Body {
            error: Option<String>,
        }

        let message = serde_json::from_str::<Body>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Self::Api { status, message }
    }

    /// The HTTP status, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(_) | Self::Json(_) => None,
        }
    }
}
