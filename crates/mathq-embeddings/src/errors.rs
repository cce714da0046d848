//! Embedding and index error types.

use thiserror::Error;

/// Result alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors from the embedding collaborator.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The HTTP request to the embedding API failed (connect, timeout, TLS).
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The embedding API returned a non-success status.
    #[error("embedding API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response parsed but is not in the expected shape.
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),

    /// A returned vector has the wrong dimension.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Inference failed (mock failure injection, empty results).
    #[error("embedding inference failed: {0}")]
    Inference(String),
}

/// Errors from the vector index.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// A build-time row or a query vector does not match the index dimension.
    #[error("vector dimension mismatch: index dimension {expected}, got {actual}")]
    DimensionMismatch {
        /// Index dimension.
        expected: usize,
        /// Offending vector's dimension.
        actual: usize,
    },

    /// Build was given no vectors.
    #[error("cannot build an index over zero vectors")]
    EmptyBuild,
}
