//! Plain-text chat endpoint for clients that cannot build JSON

use crate::handlers::{AppState, read_body, relay_message};
use crate::middleware::RequestId;
use crate::relay::{InboundMessage, OutputMode};
use axum::{
    Extension,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    response::Response,
};

/// POST /chat-text handler
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let intake = read_body(body).and_then(|body| InboundMessage::from_raw_body(&body));
    relay_message(&state, request_id, OutputMode::PlainText, intake).await
}
