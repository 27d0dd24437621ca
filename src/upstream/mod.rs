//! Upstream completion API
//!
//! The relay talks to the remote model through the [`CompletionClient`]
//! trait. Production uses [`OpenAiClient`]; tests plug in doubles.

pub mod openai;
pub mod types;

pub use openai::OpenAiClient;
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Role};

use async_trait::async_trait;
use thiserror::Error;

/// Maximum number of characters of an upstream error body kept for logging
pub const ERROR_BODY_EXCERPT_CHARS: usize = 512;

/// Failure reaching or parsing the remote completion API
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("transport failure calling {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// A single awaited chat completion call
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send `text` as the user turn and return the parsed response body
    async fn complete(&self, text: &str) -> Result<ChatCompletionResponse, UpstreamError>;
}

/// Truncate an upstream body for logging without splitting a UTF-8 character
pub(crate) fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= ERROR_BODY_EXCERPT_CHARS {
        return text.into_owned();
    }
    let mut truncated: String = text.chars().take(ERROR_BODY_EXCERPT_CHARS).collect();
    truncated.push_str("...");
    truncated
}
