//! Embedding service trait and mock implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{EmbeddingError, Result};
use crate::normalize::l2_normalize;

/// Trait for embedding text into vectors.
///
/// Implementations must return vectors of a single, consistent dimension;
/// corpus-vs-query dimension agreement is enforced downstream by the index.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embed a batch of texts, preserving input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text (default: calls `embed` with one item).
    async fn embed_single(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Inference("empty result".into()))
    }
}

/// Mock embedding service for testing.
///
/// Generates deterministic embeddings by hashing input text with SHA-256,
/// using the hash bytes as seeds for the vector components. Identical texts
/// always map to identical unit vectors, so a text embedded at build time
/// and again at query time scores 1.0 against itself.
pub struct MockEmbeddingService {
    dims: usize,
    failing: AtomicBool,
}

impl MockEmbeddingService {
    /// Create a new mock service with the given dimensions.
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail, for collaborator-failure tests.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();

        let mut v: Vec<f32> = (0..self.dims)
            .map(|i| {
                let byte_idx = i % hash.len();
                // Map byte to [-1, 1] range
                (f32::from(hash[byte_idx]) / 127.5) - 1.0
            })
            .collect();

        l2_normalize(&mut v);
        v
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::Inference("mock failure injected".into()));
        }
        Ok(texts.iter().map(|t| self.hash_to_vector(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::l2_norm;

    #[tokio::test]
    async fn mock_single_returns_correct_dims() {
        let svc = MockEmbeddingService::new(64);
        let result = svc.embed_single("test").await.unwrap();
        assert_eq!(result.len(), 64);
    }

    #[tokio::test]
    async fn mock_batch_preserves_order_and_count() {
        let svc = MockEmbeddingService::new(32);
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let results = svc.embed(&texts).await.unwrap();
        assert_eq!(results.len(), 3);
        let again = svc.embed_single("b").await.unwrap();
        assert_eq!(results[1], again);
    }

    #[tokio::test]
    async fn mock_deterministic_same_input() {
        let svc = MockEmbeddingService::new(64);
        let a = svc.embed_single("hello world").await.unwrap();
        let b = svc.embed_single("hello world").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn mock_different_inputs_different_outputs() {
        let svc = MockEmbeddingService::new(64);
        let a = svc.embed_single("hello").await.unwrap();
        let b = svc.embed_single("world").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn mock_outputs_are_unit_vectors() {
        let svc = MockEmbeddingService::new(64);
        let v = svc.embed_single("What is 2 + 2?").await.unwrap();
        assert!((l2_norm(&v) - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn mock_failure_injection_returns_error() {
        let svc = MockEmbeddingService::new(64);
        svc.set_failing(true);
        let result = svc.embed_single("test").await;
        assert!(matches!(result, Err(EmbeddingError::Inference(_))));
    }
}
