//! Similarity classifier: embedding, index query, threshold and ranking.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use mathq_core::{CorpusQuestion, SimilarityMatch};
use mathq_embeddings::{EmbeddingService, VectorIndex, l2_normalize};

use crate::errors::{Result, WorkflowError};
use crate::metric_names;

/// Duplicate-detection policy over the vector index.
///
/// Holds the corpus and its index side by side; slot `i` of the index is
/// corpus entry `i`, established at build time and immutable afterward.
/// Read-only post-build, safe to share behind an `Arc` without locking.
pub struct SimilarityClassifier {
    embedder: Arc<dyn EmbeddingService>,
    index: VectorIndex,
    corpus: Vec<CorpusQuestion>,
    top_k: usize,
    threshold: f32,
}

impl std::fmt::Debug for SimilarityClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityClassifier")
            .field("index", &self.index)
            .field("corpus", &self.corpus)
            .field("top_k", &self.top_k)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl SimilarityClassifier {
    /// Embed the corpus and build the index.
    ///
    /// One-shot startup operation. Fails on an empty corpus, on any
    /// embedding failure, and on any corpus/index size disagreement,
    /// all of which make every later similarity answer meaningless, so
    /// none of them is allowed to survive into serving.
    #[instrument(skip_all, fields(corpus = corpus.len()))]
    pub async fn build(
        embedder: Arc<dyn EmbeddingService>,
        corpus: Vec<CorpusQuestion>,
        top_k: usize,
        threshold: f32,
    ) -> Result<Self> {
        let texts: Vec<String> = corpus.iter().map(|q| q.text.clone()).collect();
        let mut vectors = embedder.embed(&texts).await?;
        for v in &mut vectors {
            l2_normalize(v);
        }

        let index = VectorIndex::build(vectors)?;
        if index.len() != corpus.len() {
            return Err(WorkflowError::Misaligned {
                corpus: corpus.len(),
                index: index.len(),
            });
        }

        info!(
            questions = corpus.len(),
            dimension = index.dimension(),
            top_k,
            threshold,
            "similarity index built"
        );

        Ok(Self {
            embedder,
            index,
            corpus,
            top_k,
            threshold,
        })
    }

    /// Number of corpus questions behind the index.
    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    /// Find corpus questions that near-duplicate `text`.
    ///
    /// Embeds the candidate, queries the top `top_k` neighbors, keeps those
    /// scoring at or above the threshold, and returns them in descending
    /// score order. An empty result is the normal "no duplicates" answer.
    #[instrument(skip_all)]
    pub async fn find_duplicates(&self, text: &str) -> Result<Vec<SimilarityMatch>> {
        let mut vector = self.embedder.embed_single(text).await?;
        l2_normalize(&mut vector);

        let neighbors = self.index.query(&vector, self.top_k)?;
        let matches: Vec<SimilarityMatch> = neighbors
            .into_iter()
            .filter(|(_, score)| *score >= self.threshold)
            .map(|(slot, score)| SimilarityMatch::from_corpus(&self.corpus[slot], score))
            .collect();

        metrics::counter!(metric_names::SIMILARITY_QUERIES_TOTAL).increment(1);
        metrics::histogram!(metric_names::SIMILARITY_MATCHES).record(matches.len() as f64);
        debug!(matches = matches.len(), "similarity query complete");

        Ok(matches)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
