//! Text-completion collaborator boundary
//!
//! The classifier only needs one thing from the outside world: given an
//! ordered list of role-tagged messages and a temperature, return
//! generated text. `CompletionModel` is that seam; `OpenAiCompatClient`
//! implements it against any OpenAI-compatible chat completions API, and
//! `MockCompletionModel` stands in for tests.

mod mock;
mod openai;

pub use mock::MockCompletionModel;
pub use openai::OpenAiCompatClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the completion collaborator
///
/// The classifier treats all of these as recoverable; they feed the
/// fallback tiers and never propagate past it.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Configuration error (missing API key, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, empty choices)
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One role-tagged message in a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The text-completion collaborator contract
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Sends the messages and returns the generated text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, CompletionError>;
}
