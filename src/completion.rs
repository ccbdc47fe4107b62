//! Chat-completion transport.
//!
//! [`CompletionTransport`] performs exactly one request/response exchange
//! with the model provider and reports failures as [`GenerationError`]s.
//! Retrying is left to [`RetryPolicy`](crate::retry::RetryPolicy).

use crate::error::GenerationError;
use crate::http_client::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

/// Body of a `POST /chat/completions` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
}

impl CompletionRequest {
    /// Non-streaming request made of a system instruction and one user prompt.
    pub fn new(model: &str, system: &str, prompt: &str, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(prompt)],
            temperature,
            max_tokens,
            top_p: 1.0,
            stream: false,
        }
    }

    pub fn prompt(&self) -> &str {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Generated text and total token usage reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub total_tokens: u32,
}

#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GenerationError>;
}

// ===== OpenAI-compatible wire format =====

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Transport for OpenAI-compatible chat-completion endpoints (Groq by default).
pub struct ChatCompletionsClient {
    http: Box<dyn HttpClient>,
    api_base: String,
    api_key: String,
}

impl ChatCompletionsClient {
    pub fn new(http: Box<dyn HttpClient>, api_base: &str, api_key: &str) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl CompletionTransport for ChatCompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GenerationError> {
        let body = serde_json::to_value(request)
            .map_err(|e| GenerationError::Transport(format!("could not encode request: {e}")))?;
        let auth = format!("Bearer {}", self.api_key);
        let headers = [
            ("Authorization", auth.as_str()),
            ("Content-Type", "application/json"),
        ];

        debug!(
            "POST {} model={} max_tokens={}",
            self.endpoint(),
            request.model,
            request.max_tokens
        );

        let response = self
            .http
            .post_json(&self.endpoint(), &headers, &body)
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.is_success() {
            let message = provider_error_message(&response.body);
            return Err(if response.status == 429 {
                GenerationError::RateLimited(message)
            } else {
                GenerationError::Api {
                    status: response.status,
                    message,
                }
            });
        }

        parse_completion(&response.body)
    }
}

/// Extracts `error.message` from a provider error body, or falls back to the raw body.
fn provider_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn parse_completion(body: &str) -> Result<Completion, GenerationError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| GenerationError::MalformedResponse("no message content".to_string()))?;

    let total_tokens = parsed
        .usage
        .and_then(|u| u.total_tokens)
        .ok_or_else(|| GenerationError::MalformedResponse("no token usage".to_string()))?;

    Ok(Completion { text, total_tokens })
}

/// Offline transport that answers deterministically from the prompt.
pub struct MockCompletionClient;

impl MockCompletionClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionTransport for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GenerationError> {
        let prompt = request.prompt();
        let headline = prompt.lines().next().unwrap_or_default().trim();
        let text = format!(
            "[mock {}] Draft generated for request:\n{}\n\nThis is placeholder copy produced without contacting the model provider.",
            request.model, headline
        );
        let prompt_words = u32::try_from(prompt.split_whitespace().count()).unwrap_or(u32::MAX);
        let text_words = u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX);

        Ok(Completion {
            text,
            total_tokens: prompt_words.saturating_add(text_words),
        })
    }
}
