//! HTTP request handlers for the chat relay

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::{Metrics, Outcome};
use crate::middleware::{CorsPolicy, RequestId, cors_middleware, request_id_middleware};
use crate::relay::{CompletionResult, InboundMessage, OutputMode, Relay, render};
use crate::upstream::{CompletionClient, OpenAiClient};
use axum::{
    Router,
    body::Bytes,
    extract::rejection::BytesRejection,
    middleware,
    response::Response,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

pub mod chat;
pub mod chat_text;
pub mod health;
pub mod metrics;

/// Application state shared across all handlers
///
/// Every field is immutable or internally synchronized, so cloning is a
/// handful of Arc bumps.
#[derive(Clone)]
pub struct AppState {
    relay: Arc<Relay>,
    metrics: Arc<Metrics>,
    cors: Arc<CorsPolicy>,
}

impl AppState {
    /// Create state that calls the configured upstream API
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = OpenAiClient::new(&config.upstream)?;
        Self::with_client(Arc::new(client))
    }

    /// Create state around any completion client
    pub fn with_client(client: Arc<dyn CompletionClient>) -> AppResult<Self> {
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to register metrics: {}", e)))?;

        Ok(Self {
            relay: Arc::new(Relay::new(client)),
            metrics: Arc::new(metrics),
            cors: Arc::new(CorsPolicy::permissive()),
        })
    }

    /// Replace the cross-origin policy
    pub fn with_cors_policy(mut self, policy: CorsPolicy) -> Self {
        self.cors = Arc::new(policy);
        self
    }

    pub fn relay(&self) -> &Relay {
        &self.relay
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn cors_policy(&self) -> Arc<CorsPolicy> {
        self.cors.clone()
    }
}

/// Build the full application router
///
/// Layer order, outermost first: request id, CORS, tracing.
pub fn router(state: AppState) -> Router {
    let cors = state.cors_policy();

    Router::new()
        .route("/health", get(health::handler))
        .route("/chat", post(chat::handler))
        .route("/chat-text", post(chat_text::handler))
        .route("/metrics", get(metrics::handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(cors, cors_middleware))
        .layer(middleware::from_fn(request_id_middleware))
}

/// Buffered request body, or the reason it could not be read
///
/// An unreadable body (over the size limit, or a broken stream) carries no
/// usable message, so it is rejected the same way as a blank one.
pub(crate) fn read_body(body: Result<Bytes, BytesRejection>) -> AppResult<Bytes> {
    body.map_err(|rejection| {
        AppError::InvalidRequest(format!(
            "request body unreadable ({}): {}",
            rejection.status(),
            rejection.body_text()
        ))
    })
}

/// Shared path of both chat endpoints
///
/// Skips the upstream call when intake failed, logs the real cause of
/// server-side failures, records metrics, then renders for `mode`.
pub(crate) async fn relay_message(
    state: &AppState,
    request_id: RequestId,
    mode: OutputMode,
    intake: AppResult<InboundMessage>,
) -> Response {
    let outcome = match intake {
        Ok(message) => {
            tracing::debug!(
                request_id = %request_id,
                mode = mode.as_str(),
                message_length = message.text().len(),
                "Received chat request"
            );
            call_upstream(state, request_id, &message).await
        }
        Err(e) => Err(e),
    };

    let label = match &outcome {
        Ok(result) if result.is_present() => Outcome::Replied,
        Ok(_) => {
            tracing::warn!(
                request_id = %request_id,
                mode = mode.as_str(),
                "Upstream returned no completion text, sending fallback reply"
            );
            Outcome::Fallback
        }
        Err(e) if e.is_client_error() => {
            tracing::debug!(
                request_id = %request_id,
                mode = mode.as_str(),
                error = %e,
                "Rejected chat request"
            );
            Outcome::Rejected
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                mode = mode.as_str(),
                error = %e,
                "Chat request failed"
            );
            Outcome::Failed
        }
    };

    if let Err(e) = state.metrics().record_request(mode, label) {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }

    render(mode, outcome)
}

async fn call_upstream(
    state: &AppState,
    request_id: RequestId,
    message: &InboundMessage,
) -> AppResult<CompletionResult> {
    let started = Instant::now();
    let result = state.relay().complete(message).await;
    let elapsed = started.elapsed().as_secs_f64();

    tracing::info!(
        request_id = %request_id,
        success = result.is_ok(),
        upstream_duration_ms = elapsed * 1000.0,
        "Upstream call finished"
    );

    if let Err(e) = state
        .metrics()
        .record_upstream_duration(result.is_ok(), elapsed)
    {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }

    result
}
