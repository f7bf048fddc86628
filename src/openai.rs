//! OpenAI-backed providers for the embedding and composition boundaries.
//!
//! This module is only available when the `openai` feature is enabled.
//! One [`OpenAiClient`] serves both roles: [`EmbeddingProvider`] via the
//! embeddings API and [`AnswerComposer`] via chat completions.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::compose::{AnswerComposer, Segment};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, RetrievalError};

/// The OpenAI embeddings API endpoint.
const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// The OpenAI chat completions API endpoint.
const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// The default answer model.
const DEFAULT_ANSWER_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for answer composition.
const ANSWER_TEMPERATURE: f32 = 0.2;

/// Per-request timeout. External calls must never block unrelated queries.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An OpenAI-backed embedding provider and answer composer.
///
/// # Configuration
///
/// - `embedding_model` – defaults to `text-embedding-3-small`.
/// - `answer_model` – defaults to `gpt-4o-mini`.
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use opsrag::openai::OpenAiClient;
///
/// let client = OpenAiClient::from_env()?;
/// let embedding = client.embed("walk-in cooler temps").await?;
/// ```
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    embedding_model: String,
    answer_model: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if the key is empty or the HTTP
    /// client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RetrievalError::Config("API key must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RetrievalError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            embedding_model: DEFAULT_EMBEDDING_MODEL.into(),
            answer_model: DEFAULT_ANSWER_MODEL.into(),
        })
    }

    /// Create a new client using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            RetrievalError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Set the embedding model.
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    /// Set the answer model.
    pub fn with_answer_model(mut self, model: impl Into<String>) -> Self {
        self.answer_model = model.into();
        self
    }

    /// Extract a readable detail from an error response body.
    async fn error_detail(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        format!("API returned {status}: {detail}")
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
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
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = "OpenAI", text_len = text.len(), "embedding single text");

        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RetrievalError::Semantic {
            provider: "OpenAI".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "OpenAI",
            batch_size = texts.len(),
            model = %self.embedding_model,
            "embedding batch"
        );

        let request_body =
            EmbeddingRequest { model: &self.embedding_model, input: texts.to_vec() };

        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "embedding request failed");
                RetrievalError::Semantic {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let message = Self::error_detail(response).await;
            error!(provider = "OpenAI", message = %message, "embedding API error");
            return Err(RetrievalError::Semantic { provider: "OpenAI".into(), message });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse embedding response");
            RetrievalError::Semantic {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }
}

// ── AnswerComposer implementation ──────────────────────────────────

/// Render the reference-context block handed to the answer model.
fn reference_context(segments: &[Segment]) -> String {
    segments
        .iter()
        .enumerate()
        .map(|(i, s)| format!("[{}] {} p.{}\n{}", i + 1, s.doc_name, s.page, s.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl AnswerComposer for OpenAiClient {
    async fn compose(&self, question: &str, segments: &[Segment]) -> Result<String> {
        debug!(
            provider = "OpenAI",
            model = %self.answer_model,
            segment_count = segments.len(),
            "composing answer"
        );

        let prompt = format!(
            "You are an operations assistant for a quick-service restaurant. \
             Use the reference context to answer succinctly. Always add a Sources \
             section with file and page numbers.\n\nQUESTION:\n{question}\n\nREFERENCE:\n{}",
            reference_context(segments)
        );

        let request_body = ChatRequest {
            model: &self.answer_model,
            temperature: ANSWER_TEMPERATURE,
            messages: vec![ChatMessage { role: "user", content: &prompt }],
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "OpenAI", error = %e, "composition request failed");
                RetrievalError::Composition {
                    provider: "OpenAI".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let message = Self::error_detail(response).await;
            error!(provider = "OpenAI", message = %message, "composition API error");
            return Err(RetrievalError::Composition { provider: "OpenAI".into(), message });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "OpenAI", error = %e, "failed to parse composition response");
            RetrievalError::Composition {
                provider: "OpenAI".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat_response.choices.into_iter().next().map(|c| c.message.content).ok_or_else(|| {
            RetrievalError::Composition {
                provider: "OpenAI".into(),
                message: "API returned no choices".into(),
            }
        })
    }
}
