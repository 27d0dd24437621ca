//! Error types for the chat relay
//!
//! All errors implement `IntoResponse` for Axum handlers. The default
//! rendering is the structured (JSON) envelope; plain-text endpoints go
//! through `relay::normalize::render` instead.

use crate::upstream::UpstreamError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Machine-readable code for a missing or blank message
pub const MESSAGE_MISSING: &str = "message_missing";

/// Machine-readable code for every server-side failure
pub const SERVER_ERROR: &str = "server_error";

/// Plain-text body returned when the message is missing
pub const MESSAGE_MISSING_TEXT: &str = "message missing";

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file '{path}': {source}")]
    ConfigFileRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ConfigParseFailed {
        path: String,
        source: toml::de::Error,
    },

    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream completion failed: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status surfaced to the caller
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code placed in the structured error envelope
    ///
    /// Never carries the underlying cause.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => MESSAGE_MISSING,
            _ => SERVER_ERROR,
        }
    }

    /// Body used when the caller invoked a plain-text endpoint
    pub fn plain_text(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => MESSAGE_MISSING_TEXT,
            _ => SERVER_ERROR,
        }
    }

    /// Whether this error was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.code(),
        }));

        (self.status(), body).into_response()
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
