//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]` so partial
//! JSON files are allowed; missing fields get production defaults during
//! deserialization. Each type implements [`Default`] with those values.

use serde::{Deserialize, Serialize};

/// Root settings type for the mathq service.
///
/// # JSON Format
///
/// All field names are camelCase. Example:
///
/// ```json
/// {
///   "server": { "port": 9000 },
///   "similarity": { "scoreThreshold": 0.85 }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MathqSettings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// OpenAI provider settings (chat + embeddings).
    pub openai: OpenAiSettings,
    /// Similarity classifier settings.
    pub similarity: SimilaritySettings,
    /// Session store settings.
    pub sessions: SessionSettings,
    /// Corpus source settings.
    pub corpus: CorpusSettings,
}

/// HTTP server network settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// OpenAI provider settings.
///
/// The API key is not here; it comes from `OPENAI_API_KEY`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiSettings {
    /// Base URL for the OpenAI API.
    pub base_url: String,
    /// Chat model used for validation and refinement.
    pub chat_model: String,
    /// Embedding model.
    pub embedding_model: String,
    /// Sampling temperature for chat calls.
    pub temperature: f64,
    /// Per-request timeout for both collaborators, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-5".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            temperature: 0.3,
            request_timeout_secs: 60,
        }
    }
}

/// Similarity classifier settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimilaritySettings {
    /// Number of nearest neighbors fetched per query.
    pub top_k: usize,
    /// Minimum cosine similarity for a near-duplicate.
    pub score_threshold: f32,
}

impl Default for SimilaritySettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            score_threshold: 0.80,
        }
    }
}

/// Session store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionSettings {
    /// Maximum number of live sessions. At capacity, the
    /// least-recently-active session is evicted to admit a new one.
    pub max_sessions: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self { max_sessions: 1024 }
    }
}

/// Corpus source settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorpusSettings {
    /// Path to the corpus JSON file.
    pub path: String,
}

impl Default for CorpusSettings {
    fn default() -> Self {
        Self {
            path: "questions.json".to_string(),
        }
    }
}

impl MathqSettings {
    /// Clamp out-of-range values instead of rejecting them, so users get
    /// corrected behavior rather than a confusing startup error.
    pub fn validate(&mut self) {
        if self.similarity.score_threshold < -1.0 || self.similarity.score_threshold > 1.0 {
            let clamped = self.similarity.score_threshold.clamp(-1.0, 1.0);
            tracing::warn!(
                threshold = self.similarity.score_threshold,
                clamped,
                "similarity.scoreThreshold out of range, clamped"
            );
            self.similarity.score_threshold = clamped;
        }
        if self.similarity.top_k == 0 {
            tracing::warn!("similarity.topK must be at least 1, using 1");
            self.similarity.top_k = 1;
        }
        if self.sessions.max_sessions == 0 {
            tracing::warn!("sessions.maxSessions must be at least 1, using 1");
            self.sessions.max_sessions = 1;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_values() {
        let s = MathqSettings::default();
        assert_eq!(s.server.port, 8000);
        assert_eq!(s.openai.chat_model, "gpt-5");
        assert_eq!(s.openai.embedding_model, "text-embedding-3-small");
        assert!((s.openai.temperature - 0.3).abs() < f64::EPSILON);
        assert_eq!(s.similarity.top_k, 5);
        assert!((s.similarity.score_threshold - 0.80).abs() < f32::EPSILON);
        assert_eq!(s.sessions.max_sessions, 1024);
        assert_eq!(s.corpus.path, "questions.json");
    }

    #[test]
    fn partial_json_fills_defaults() {
        let s: MathqSettings = serde_json::from_str(r#"{"server": {"port": 9000}}"#).unwrap();
        assert_eq!(s.server.port, 9000);
        assert_eq!(s.server.host, "0.0.0.0");
        assert_eq!(s.similarity.top_k, 5);
    }

    #[test]
    fn validate_clamps_threshold() {
        let mut s = MathqSettings::default();
        s.similarity.score_threshold = 1.5;
        s.validate();
        assert!((s.similarity.score_threshold - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn validate_fixes_zero_top_k() {
        let mut s = MathqSettings::default();
        s.similarity.top_k = 0;
        s.validate();
        assert_eq!(s.similarity.top_k, 1);
    }

    #[test]
    fn validate_fixes_zero_max_sessions() {
        let mut s = MathqSettings::default();
        s.sessions.max_sessions = 0;
        s.validate();
        assert_eq!(s.sessions.max_sessions, 1);
    }
}
