//! Chat-completion contract for the remote language model.
//!
//! The model is an opaque oracle: we send a system and a user message and
//! read back the free-form text of the first choice. Callers depend on the
//! [`CompletionClient`] trait so the HTTP transport can be swapped out.
mod http;

pub use http::HttpCompletionClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model identifier sent with every request.
pub const COMPLETION_MODEL: &str = "gpt-4o-mini";
/// Sampling temperature sent with every request.
pub const COMPLETION_TEMPERATURE: f32 = 0.7;
/// Token ceiling for the model's answer.
pub const COMPLETION_MAX_TOKENS: u32 = 1000;
/// Endpoint used when the config does not name one.
pub const DEFAULT_COMPLETION_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat-completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Build a request with the fixed model parameters.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            model: COMPLETION_MODEL.to_string(),
            messages,
            temperature: COMPLETION_TEMPERATURE,
            max_tokens: COMPLETION_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Why a completion call produced no usable text.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion transport failed: {0}")]
    Transport(String),
    #[error("completion endpoint returned status {code}")]
    Status { code: u16 },
    #[error("completion response envelope invalid: {0}")]
    Envelope(String),
    #[error("completion response has no message content")]
    EmptyMessage,
}

/// A chat-completion backend.
pub trait CompletionClient {
    /// Send one request and return the first choice's message text.
    fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError>;
}

/// Pull `choices[0].message.content` out of a response body.
pub fn message_from_envelope(body: &str) -> Result<String, CompletionError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|err| CompletionError::Envelope(err.to_string()))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or(CompletionError::EmptyMessage)?;
    if content.trim().is_empty() {
        return Err(CompletionError::EmptyMessage);
    }
    Ok(content)
}
