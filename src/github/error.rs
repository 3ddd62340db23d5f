//! Error types for GitHub GraphQL operations.
//!
//! Every failure a request can end in is a variant of [`ClientError`].
//! Partial successes (node-level `NOT_FOUND` / `FORBIDDEN`) are not errors:
//! the classifier swallows them and keeps them on the response envelope.

/// Errors that can occur while sending or interpreting a GraphQL request.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The client could not be constructed from the supplied configuration.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The request never produced an HTTP response (DNS, TLS, connection reset, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-200 status. The message is the raw response body.
    #[error("{body}")]
    HttpStatus {
        /// HTTP status code returned by the API.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// The response carried GraphQL errors that are not benign visibility errors.
    ///
    /// The message is the first error's message.
    #[error("{message}")]
    GraphQL {
        message: String,
        error_type: Option<String>,
    },

    /// The response body or its `data` did not match the expected shape.
    #[error("failed to decode GraphQL response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns the HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// A specialized Result type for GitHub GraphQL operations.
pub type Result<T> = std::result::Result<T, ClientError>;
