//! reqwest-backed client for the OpenAI chat completion endpoint

use super::{
    ChatCompletionRequest, ChatCompletionResponse, CompletionClient, UpstreamError, excerpt,
};
use crate::config::{ApiKey, UpstreamConfig};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;

/// Chat completion client
///
/// Holds one pooled `reqwest::Client` for the process lifetime. No timeout
/// is configured beyond reqwest's defaults and failed calls are never retried.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    url: String,
    api_key: Option<ApiKey>,
}

impl OpenAiClient {
    /// Create a client for the configured endpoint and credential
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, text: &str) -> Result<ChatCompletionResponse, UpstreamError> {
        let body = ChatCompletionRequest::for_message(text);

        let mut request = self.http.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose());
        }

        tracing::debug!(
            url = %self.url,
            model = body.model(),
            message_length = text.len(),
            "Sending completion request upstream"
        );

        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                url: self.url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: excerpt(&bytes),
            });
        }

        tracing::debug!(
            status = %status,
            body_length = bytes.len(),
            "Completion response received"
        );

        serde_json::from_slice::<ChatCompletionResponse>(&bytes)
            .map_err(|e| UpstreamError::Malformed(format!("{} (body: {})", e, excerpt(&bytes))))
    }
}
