//! Response normalization
//!
//! Every outcome of a relay request, success or failure, is rendered by
//! [`render`] according to the [`OutputMode`] of the endpoint that was hit.

use crate::error::AppResult;
use crate::upstream::ChatCompletionResponse;
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Reply substituted when the upstream produced no usable text
pub const FALLBACK_REPLY: &str = "Sorry, no reply generated.";

/// Content type of plain-text responses
pub const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Serialization expected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// `POST /chat`: JSON in, JSON out
    Structured,
    /// `POST /chat-text`: raw text in, raw text out
    PlainText,
}

impl OutputMode {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Structured => "structured",
            OutputMode::PlainText => "plain_text",
        }
    }
}

/// Text extracted from an upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    reply_text: String,
    present: bool,
}

impl CompletionResult {
    /// Take the first choice's content, trimmed, or the fallback reply
    pub fn from_response(response: &ChatCompletionResponse) -> Self {
        match response.first_content().map(str::trim) {
            Some(text) if !text.is_empty() => Self {
                reply_text: text.to_string(),
                present: true,
            },
            _ => Self::fallback(),
        }
    }

    /// Result carrying [`FALLBACK_REPLY`]
    pub fn fallback() -> Self {
        Self {
            reply_text: FALLBACK_REPLY.to_string(),
            present: false,
        }
    }

    pub fn reply_text(&self) -> &str {
        &self.reply_text
    }

    /// False when the fallback reply was substituted
    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn into_reply_text(self) -> String {
        self.reply_text
    }
}

/// Structured success envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// Render a relay outcome for the caller
///
/// Errors only ever expose their stable code, never the cause.
pub fn render(mode: OutputMode, outcome: AppResult<CompletionResult>) -> Response {
    match (mode, outcome) {
        (OutputMode::Structured, Ok(result)) => (
            StatusCode::OK,
            Json(ChatReply {
                reply: result.into_reply_text(),
            }),
        )
            .into_response(),
        (OutputMode::PlainText, Ok(result)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, PLAIN_TEXT)],
            result.into_reply_text(),
        )
            .into_response(),
        (OutputMode::Structured, Err(err)) => err.into_response(),
        (OutputMode::PlainText, Err(err)) => (
            err.status(),
            [(header::CONTENT_TYPE, PLAIN_TEXT)],
            err.plain_text(),
        )
            .into_response(),
    }
}
