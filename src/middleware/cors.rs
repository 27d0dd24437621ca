//! Cross-origin policy
//!
//! One [`CorsPolicy`] is applied to every route, including the fallback.
//! Any `OPTIONS` request is answered directly with 200 and an empty body;
//! every other response gets the policy headers appended.

use crate::error::{AppError, AppResult};
use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Header values sent on every response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
}

impl CorsPolicy {
    /// Build a policy from an origin and lists of methods and headers
    pub fn new(origin: &str, methods: &[Method], headers: &[HeaderName]) -> AppResult<Self> {
        let allow_origin = HeaderValue::from_str(origin)
            .map_err(|e| AppError::Config(format!("invalid CORS origin '{}': {}", origin, e)))?;

        let methods = methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let allow_methods = HeaderValue::from_str(&methods)
            .map_err(|e| AppError::Config(format!("invalid CORS methods '{}': {}", methods, e)))?;

        let headers = headers
            .iter()
            .map(|h| canonical_header_name(h.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let allow_headers = HeaderValue::from_str(&headers)
            .map_err(|e| AppError::Config(format!("invalid CORS headers '{}': {}", headers, e)))?;

        Ok(Self {
            allow_origin,
            allow_methods,
            allow_headers,
        })
    }

    /// Any origin; GET, POST and OPTIONS; `Content-Type` and `Authorization`
    pub fn permissive() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_methods: HeaderValue::from_static("GET, POST, OPTIONS"),
            allow_headers: HeaderValue::from_static("Content-Type, Authorization"),
        }
    }

    /// Insert the policy headers, replacing any already present
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
    }

    pub fn allow_origin(&self) -> &HeaderValue {
        &self.allow_origin
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

/// `Content-Type` style capitalization for display in the allow list
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Middleware applying a shared [`CorsPolicy`]
pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS {
        tracing::debug!(uri = %request.uri(), "Answering preflight request");
        let mut response = StatusCode::OK.into_response();
        policy.apply(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    policy.apply(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};

    #[test]
    fn test_permissive_policy_headers() {
        let mut headers = HeaderMap::new();
        CorsPolicy::permissive().apply(&mut headers);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
    }

    #[test]
    fn test_new_matches_permissive() {
        let policy = CorsPolicy::new(
            "*",
            &[Method::GET, Method::POST, Method::OPTIONS],
            &[CONTENT_TYPE, AUTHORIZATION],
        )
        .expect("should build policy");
        assert_eq!(policy, CorsPolicy::permissive());
    }

    #[test]
    fn test_new_rejects_invalid_origin() {
        let err = CorsPolicy::new("bad\norigin", &[Method::GET], &[]).unwrap_err();
        assert!(err.to_string().contains("CORS origin"));
    }

    #[test]
    fn test_canonical_header_name() {
        assert_eq!(canonical_header_name("content-type"), "Content-Type");
        assert_eq!(canonical_header_name("x-request-id"), "X-Request-Id");
    }

    #[test]
    fn test_apply_overwrites_existing_values() {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("https://example.com"),
        );
        CorsPolicy::permissive().apply(&mut headers);
        assert_eq!(headers.get_all(ACCESS_CONTROL_ALLOW_ORIGIN).iter().count(), 1);
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
