//! Wire types for the OpenAI-compatible chat completion API
//!
//! The request is always one system turn plus one user turn. The response
//! side is lenient: missing `choices`, `message`, or `content` deserialize
//! to `None` so the relay can fall back instead of failing. A body of the
//! wrong shape (e.g. `choices` as a string) is still a parse error.

use serde::{Deserialize, Serialize};

/// Model identifier sent with every completion request
pub const MODEL: &str = "gpt-4o-mini";

/// System instruction sent with every completion request
pub const SYSTEM_INSTRUCTION: &str =
    "You turn user requests into short helpful replies. Keep it concise.";

/// Message author role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One turn of the outgoing conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Outgoing completion request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// Build the fixed two-turn request for a user message
    pub fn for_message(text: &str) -> Self {
        Self {
            model: MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: text.to_string(),
                },
            ],
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Parsed completion response body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Response whose first choice carries `content`
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: Some(vec![Choice {
                message: Some(ResponseMessage {
                    content: Some(content.into()),
                }),
            }]),
        }
    }

    /// Raw content of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .as_deref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
    }
}
