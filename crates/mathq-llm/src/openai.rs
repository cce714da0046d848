//! OpenAI Chat Completions provider for the language service.
//!
//! Non-streaming: validation and refinement replies are short, so the
//! provider waits for the full completion and parses it in one step.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::errors::{LlmError, Result};
use crate::prompts::{
    EDITOR_SYSTEM_PROMPT, VALIDATOR_SYSTEM_PROMPT, refinement_user_message,
    validation_user_message,
};
use crate::service::{LanguageService, RefinementContext, Verdict};

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Default sampling temperature. Low, because both roles want faithful
/// rewrites rather than creative ones.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// OpenAI chat provider configuration.
#[derive(Clone, Debug)]
pub struct OpenAiChatConfig {
    /// API key for Bearer auth.
    pub api_key: String,
    /// Chat model id.
    pub model: String,
    /// Base URL (no trailing slash).
    pub base_url: String,
    /// Sampling temperature.
    pub temperature: f64,
}

/// OpenAI Chat Completions language service.
pub struct OpenAiChatService {
    config: OpenAiChatConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiChatService {
    /// Create a new chat service.
    #[must_use]
    pub fn new(config: OpenAiChatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Create a new chat service with a shared HTTP client.
    ///
    /// The client carries the request timeout configured at startup, so
    /// collaborator calls are always bounded.
    #[must_use]
    pub fn with_client(config: OpenAiChatConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let auth_value = format!("Bearer {}", self.config.api_key);
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value).map_err(|e| {
                LlmError::MalformedResponse(format!("invalid API key header: {e}"))
            })?,
        );
        Ok(headers)
    }

    /// One system+user completion round trip, returning the trimmed reply.
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let request = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        debug!(user_len = user.len(), "sending chat request");

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
            error!(status = status.as_u16(), %message, "chat API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("completion has no content".into()))?;

        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(LlmError::MalformedResponse("completion is empty".into()));
        }
        Ok(content)
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
        .unwrap_or_else(|| {
            let mut end = body.len().min(200);
            while end > 0 && !body.is_char_boundary(end) {
                end -= 1;
            }
            body[..end].to_owned()
        })
}

#[async_trait]
impl LanguageService for OpenAiChatService {
    #[instrument(skip_all, fields(provider = "openai"))]
    async fn validate(&self, text: &str) -> Result<Verdict> {
        let reply = self
            .complete(VALIDATOR_SYSTEM_PROMPT, &validation_user_message(text))
            .await?;
        crate::prompts::parse_verdict(&reply)
    }

    #[instrument(skip_all, fields(provider = "openai", has_context = context.is_some()))]
    async fn refine(&self, text: &str, context: Option<&RefinementContext>) -> Result<String> {
        self.complete(
            EDITOR_SYSTEM_PROMPT,
            &refinement_user_message(text, context),
        )
        .await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
