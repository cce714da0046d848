//! Reference question corpus: record type and JSON loader.
//!
//! The corpus is loaded once at startup and never mutated at runtime. Its
//! order is load-bearing: slot `i` of the vector index corresponds to entry
//! `i` of the loaded corpus, so the loader preserves file order exactly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while loading the corpus file.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus file could not be read.
    #[error("failed to read corpus file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The corpus file is not valid JSON in the expected shape.
    #[error("failed to parse corpus file {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The corpus parsed but contains no questions.
    #[error("corpus file {path} contains no questions")]
    Empty {
        /// Path of the empty corpus.
        path: String,
    },
}

/// A reference question from the fixed duplicate-detection corpus.
///
/// Immutable after load. The embedding vector is held by the vector index,
/// not here; positional alignment ties the two together.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CorpusQuestion {
    /// Unique, stable question id.
    pub id: i64,
    /// The question text.
    #[serde(rename = "question")]
    pub text: String,
    /// Mathematical domain (e.g. "calculus").
    pub domain: String,
    /// Subdomain within the domain (e.g. "differentiation").
    pub subdomain: String,
}

/// Load the corpus from a JSON file containing an array of questions.
///
/// Preserves file order. An empty array is rejected: a service with no
/// corpus cannot answer similarity queries, so this is a startup failure
/// rather than something to discover per-request.
pub fn load_corpus(path: &Path) -> Result<Vec<CorpusQuestion>, CorpusError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let questions: Vec<CorpusQuestion> =
        serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    if questions.is_empty() {
        return Err(CorpusError::Empty {
            path: path.display().to_string(),
        });
    }

    Ok(questions)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_corpus(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_questions_in_file_order() {
        let file = write_corpus(
            r#"[
                {"id": 7, "question": "What is the derivative of x^2?", "domain": "calculus", "subdomain": "differentiation"},
                {"id": 3, "question": "Prove that sqrt(2) is irrational.", "domain": "analysis", "subdomain": "proofs"}
            ]"#,
        );
        let corpus = load_corpus(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus[0].id, 7);
        assert_eq!(corpus[0].text, "What is the derivative of x^2?");
        assert_eq!(corpus[1].id, 3);
        assert_eq!(corpus[1].subdomain, "proofs");
    }

    #[test]
    fn empty_corpus_is_an_error() {
        let file = write_corpus("[]");
        let err = load_corpus(file.path()).unwrap_err();
        assert!(matches!(err, CorpusError::Empty { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_corpus("{not json");
        let err = load_corpus(file.path()).unwrap_err();
        assert!(matches!(err, CorpusError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_corpus(Path::new("/nonexistent/questions.json")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let file = write_corpus(r#"[{"id": 1, "question": "q"}]"#);
        let err = load_corpus(file.path()).unwrap_err();
        assert!(matches!(err, CorpusError::Parse { .. }));
    }
}
