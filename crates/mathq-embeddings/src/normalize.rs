//! Vector normalization and similarity helpers.
//!
//! All similarity scoring in mathq is inner-product over unit vectors,
//! which equals cosine similarity. Everything that enters the index, and
//! every query vector, must go through [`l2_normalize`] first, or scores
//! are not comparable to the duplicate threshold.

/// Euclidean (L2) norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Normalize a vector to unit length in place.
///
/// Zero vectors are left untouched (dividing by a zero norm would fill the
/// vector with NaN, which poisons every later dot product).
pub fn l2_normalize(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity of two unit-normalized vectors: their dot product.
///
/// Both inputs must have the same length; this is enforced by callers
/// (the index checks dimensions before scoring).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
