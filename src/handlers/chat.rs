//! Structured chat endpoint
//!
//! `POST /chat` with `{"message": "..."}` → `{"reply": "..."}`.

use crate::handlers::{AppState, read_body, relay_message};
use crate::middleware::RequestId;
use crate::relay::{InboundMessage, OutputMode};
use axum::{
    Extension,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::Response,
};

/// POST /chat handler
///
/// The body is read as bytes rather than through `Json` so that malformed
/// or mistyped bodies produce the same `message_missing` error as a blank
/// message, whatever the `Content-Type`.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let intake = read_body(body).and_then(|body| InboundMessage::from_json_body(&body));
    relay_message(&state, request_id, OutputMode::Structured, intake).await
}
