//! Language service error types.

use thiserror::Error;

/// Result alias for language service operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors from the language-generation collaborator.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The HTTP request to the chat API failed (connect, timeout, TLS).
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The chat API returned a non-success status.
    #[error("chat API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response parsed but is not in the expected shape.
    ///
    /// This includes a validation reply that matches neither `VALID:` nor
    /// `INVALID:`; the service fails closed rather than guessing a verdict.
    #[error("malformed chat response: {0}")]
    MalformedResponse(String),
}
