//! OpenAI embedding service.
//!
//! Calls `POST {base_url}/v1/embeddings` with Bearer auth. Non-streaming,
//! batch-capable; the response's per-item `index` field is used to restore
//! input order before returning.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::errors::{EmbeddingError, Result};
use crate::service::EmbeddingService;

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// OpenAI embedding service configuration.
#[derive(Clone, Debug)]
pub struct OpenAiEmbeddingConfig {
    /// API key for Bearer auth.
    pub api_key: String,
    /// Embedding model id.
    pub model: String,
    /// Base URL (no trailing slash).
    pub base_url: String,
}

/// OpenAI embedding service.
pub struct OpenAiEmbeddingService {
    config: OpenAiEmbeddingConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbeddingService {
    /// Create a new embedding service.
    #[must_use]
    pub fn new(config: OpenAiEmbeddingConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new embedding service with a shared HTTP client.
    ///
    /// The client carries the request timeout configured at startup, so
    /// collaborator calls are always bounded.
    #[must_use]
    pub fn with_client(config: OpenAiEmbeddingConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = format!("Bearer {}", self.config.api_key);
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| {
                EmbeddingError::MalformedResponse(format!("invalid API key header: {e}"))
            })?,
        );
        Ok(headers)
    }

    /// Reassemble response vectors into input order and check uniformity.
    fn collect_vectors(expected_count: usize, response: EmbeddingResponse) -> Result<Vec<Vec<f32>>> {
        if response.data.len() != expected_count {
            return Err(EmbeddingError::MalformedResponse(format!(
                "expected {expected_count} embeddings, got {}",
                response.data.len()
            )));
        }

        let mut ordered: Vec<Option<Vec<f32>>> = vec![None; expected_count];
        for datum in response.data {
            let slot = ordered
                .get_mut(datum.index)
                .ok_or_else(|| {
                    EmbeddingError::MalformedResponse(format!(
                        "embedding index {} out of range",
                        datum.index
                    ))
                })?;
            *slot = Some(datum.embedding);
        }

        let vectors: Vec<Vec<f32>> = ordered
            .into_iter()
            .collect::<Option<_>>()
            .ok_or_else(|| {
                EmbeddingError::MalformedResponse("duplicate or missing embedding index".into())
            })?;

        let dimension = vectors.first().map_or(0, Vec::len);
        if dimension == 0 {
            return Err(EmbeddingError::MalformedResponse(
                "embedding API returned an empty vector".into(),
            ));
        }
        for v in &vectors {
            if v.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimension,
                    actual: v.len(),
                });
            }
        }
        Ok(vectors)
    }
}

/// Extract a human-readable message from an OpenAI error body.
fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| truncated_body(body))
}

fn truncated_body(body: &str) -> String {
    let mut end = body.len().min(200);
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_owned()
}

#[async_trait]
impl EmbeddingService for OpenAiEmbeddingService {
    #[instrument(skip_all, fields(model = %self.config.model, batch = texts.len()))]
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.config.base_url);
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        debug!(batch = texts.len(), "sending embedding request");

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let message = parse_error_message(&body_text);
            error!(status = status.as_u16(), %message, "embedding API error");
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::MalformedResponse(e.to_string()))?;

        Self::collect_vectors(texts.len(), parsed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
