//! Workflow error types.

use thiserror::Error;

/// Result alias for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors surfaced by workflow operations.
///
/// Collaborator failures propagate to the caller as-is; the workflow never
/// retries and never applies a partial session write on the way out.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The language-generation collaborator failed or replied malformed.
    #[error(transparent)]
    Language(#[from] mathq_llm::LlmError),

    /// The embedding collaborator failed or replied malformed.
    #[error(transparent)]
    Embedding(#[from] mathq_embeddings::EmbeddingError),

    /// The vector index rejected a query or build input.
    #[error(transparent)]
    Index(#[from] mathq_embeddings::IndexError),

    /// Corpus entries and index slots fell out of positional alignment.
    ///
    /// Only possible at classifier build time; fatal there.
    #[error("corpus/index misalignment: {corpus} corpus entries vs {index} index slots")]
    Misaligned {
        /// Number of corpus entries.
        corpus: usize,
        /// Number of index slots.
        index: usize,
    },
}
