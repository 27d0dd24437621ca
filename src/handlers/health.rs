//! Health check endpoint
//!
//! Liveness only: the upstream API is not probed.

use axum::http::StatusCode;

/// Health check handler
///
/// Always returns 200 with the literal body `ok`.
pub async fn handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
