//! Integration tests for POST /chat-text
//!
//! Raw text in, raw text out. Errors are plain text as well.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chat_relay::{
    config::{ApiKey, Config, UpstreamConfig},
    handlers::{self, AppState},
    relay::FALLBACK_REPLY,
    upstream::types::SYSTEM_INSTRUCTION,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_app(server: &MockServer) -> Router {
    let config = Config {
        upstream: UpstreamConfig {
            base_url: format!("{}/v1", server.uri()),
            api_key: Some(ApiKey::new("test-key")),
        },
        ..Config::default()
    };
    handlers::router(AppState::new(&config).expect("should create AppState"))
}

fn completion(content: Value) -> Value {
    json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

fn text_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat-text")
        .header("content-type", "text/plain")
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_chat_text_relays_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": SYSTEM_INSTRUCTION},
                {"role": "user", "content": "hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!(" Hi there! "))))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let response = app.oneshot(text_request("  hello\n")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_string(response).await, "Hi there!");
}

#[tokio::test]
async fn test_chat_text_whitespace_only_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("unused"))))
        .expect(0)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let response = app.oneshot(text_request("   ")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/plain; charset=utf-8"
    );
    assert_eq!(body_string(response).await, "message missing");

    server.verify().await;
}

#[tokio::test]
async fn test_chat_text_empty_body_is_rejected() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let response = app.oneshot(text_request("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "message missing");
}

#[tokio::test]
async fn test_chat_text_treats_json_as_plain_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": SYSTEM_INSTRUCTION},
                {"role": "user", "content": r#"{"message":"hi"}"#}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("ok"))))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let response = app
        .oneshot(text_request(r#"{"message":"hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_chat_text_fallback_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let response = app.oneshot(text_request("hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_chat_text_oversized_body_is_rejected_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!("unused"))))
        .expect(0)
        .mount(&server)
        .await;

    let app = create_test_app(&server);
    let request = Request::builder()
        .method("POST")
        .uri("/chat-text")
        .header("content-type", "text/plain")
        .body(Body::from("a".repeat(3 * 1024 * 1024)))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain")
    );
    assert_eq!(body_string(response).await, "message missing");

    server.verify().await;
}
