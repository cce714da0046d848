//! Near-duplicate match results.

use serde::{Deserialize, Serialize};

use crate::corpus::CorpusQuestion;

/// One corpus question that scored at or above the duplicate threshold
/// against a candidate.
///
/// Transient: produced per query, returned to the caller, never stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityMatch {
    /// Id of the matching corpus question.
    pub id: i64,
    /// Text of the matching corpus question.
    pub question: String,
    /// Domain of the matching corpus question.
    pub domain: String,
    /// Subdomain of the matching corpus question.
    pub subdomain: String,
    /// Cosine similarity in [-1, 1].
    pub similarity_score: f32,
}

impl SimilarityMatch {
    /// Build a match from a corpus entry and its query score.
    pub fn from_corpus(question: &CorpusQuestion, score: f32) -> Self {
        Self {
            id: question.id,
            question: question.text.clone(),
            domain: question.domain.clone(),
            subdomain: question.subdomain.clone(),
            similarity_score: score,
        }
    }
}
