use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use webdigest::api::routes::create_router;
use webdigest::config::Config;
use webdigest::AppState;

fn test_router() -> axum::Router {
    let config = Config {
        server_addr: "127.0.0.1:0".parse().unwrap(),
        api_key: Some("test-key".to_string()),
        base_url: "http://127.0.0.1:1".to_string(),
        model: "deepseek-reasoner".to_string(),
    };
    create_router(AppState {
        config: Arc::new(config),
    })
}

async fn post_analyze(body: &str) -> (StatusCode, serde_json::Value) {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn empty_url_is_rejected_with_400() {
    let (status, body) = post_analyze(r#"{"url": ""}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("URL must not be empty"));
}

#[tokio::test]
async fn missing_url_field_is_rejected_with_400() {
    let (status, body) = post_analyze("{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn whitespace_url_is_rejected_with_400() {
    let (status, _) = post_analyze(r#"{"url": "   "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
