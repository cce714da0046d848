//! Flat inner-product vector index.
//!
//! A build-once, brute-force KNN index over the corpus embeddings. No
//! insert or delete after construction; the corpus is static for the
//! process lifetime, so there is nothing an approximate structure would
//! buy at this scale. Read-only after build, safe for unsynchronized
//! concurrent reads.

use crate::errors::IndexError;

/// Build-once index over unit-normalized vectors, scored by inner product.
///
/// Slot `i` of the index corresponds to row `i` of the build input; callers
/// keep their own positionally-aligned metadata.
#[derive(Debug)]
pub struct VectorIndex {
    /// Row-major storage, `len * dimension` values.
    data: Vec<f32>,
    dimension: usize,
    len: usize,
}

impl VectorIndex {
    /// Build an index over the given vectors.
    ///
    /// Every row must have the same dimension (the first row sets it).
    /// Vectors are expected to be unit-normalized already; the index stores
    /// them as-is. Zero rows is a build error, not a valid empty index;
    /// an index no query can ever match is a startup bug upstream.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        let Some(first) = vectors.first() else {
            return Err(IndexError::EmptyBuild);
        };
        let dimension = first.len();

        let mut data = Vec::with_capacity(vectors.len() * dimension);
        for row in &vectors {
            if row.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            dimension,
            len: vectors.len(),
        })
    }

    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no vectors. Always false post-build.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimension of the indexed vectors.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Top-k nearest neighbors of `vector` by inner product.
    ///
    /// Returns at most `min(k, len)` `(slot, score)` pairs in descending
    /// score order. The query vector must be unit-normalized like the
    /// build-time vectors for scores to mean cosine similarity.
    pub fn query(&self, vector: &[f32], k: usize) -> Result<Vec<(usize, f32)>, IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(slot, row)| {
                let score = row.iter().zip(vector.iter()).map(|(a, b)| a * b).sum();
                (slot, score)
            })
            .collect();

        // total_cmp keeps the order deterministic even if a degenerate
        // vector produced NaN scores.
        scored.sort_unstable_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k.min(self.len));
        Ok(scored)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
