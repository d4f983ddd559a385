//! Chat-completion client for OpenAI-compatible endpoints (OpenRouter by default).
//!
//! One blocking POST per call with a bounded timeout and no retry.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extraction::ParseMode;

/// Default OpenRouter chat-completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct";

/// Errors from the chat-completion call.
#[derive(Debug, Error)]
pub enum AiError {
    /// Transport or connection failure.
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("AI request timed out")]
    Timeout,

    /// The endpoint answered with something other than 200 OK.
    #[error("AI endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse AI response: {0}")]
    Parse(String),

    #[error("AI response contained no message content")]
    EmptyResponse,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Request(e.to_string())
        }
    }
}

/// Connection and sampling settings for the AI fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Full URL of the chat-completions endpoint.
    pub endpoint: String,
    /// Bearer token. `None` or empty sends no `Authorization` header.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Sent as `HTTP-Referer` (OpenRouter app attribution).
    pub referer: String,
    /// Sent as `X-Title`.
    pub title: String,
    pub parse_mode: ParseMode,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            api_key: None,
            model: DEFAULT_MODEL.into(),
            temperature: 0.2,
            timeout_secs: 60,
            referer: "http://localhost:5000".into(),
            title: "MedVice AI".into(),
            parse_mode: ParseMode::Lenient,
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Anything that can turn a message list into the assistant's reply text.
pub trait ChatCompletion {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiError>;
}

impl<T: ChatCompletion + ?Sized> ChatCompletion for &T {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiError> {
        (**self).complete(messages)
    }
}

impl<T: ChatCompletion + ?Sized> ChatCompletion for Box<T> {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiError> {
        (**self).complete(messages)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Blocking HTTP client for an OpenAI-compatible chat endpoint.
pub struct OpenRouterClient {
    client: reqwest::blocking::Client,
    config: AiConfig,
}

impl OpenRouterClient {
    /// Build a client whose requests time out after `config.timeout_secs`.
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_http_client(config, client))
    }

    /// Use a preconfigured HTTP client.
    pub fn with_http_client(config: AiConfig, client: reqwest::blocking::Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }
}

impl ChatCompletion for OpenRouterClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
        };

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            request = request.bearer_auth(key);
        }

        let response = request.send()?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| AiError::Parse(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(AiError::EmptyResponse);
        }

        log::debug!("AI raw response ({} chars): {}", content.len(), content);
        Ok(content)
    }
}
