#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::util::ServiceExt;
use wiremock::MockServer;

use threadcraft::config::AppConfig;
use threadcraft::state::AppState;

pub const BOUNDARY: &str = "threadcraft-test-boundary";

/// Router over a throwaway data directory; upstream endpoints point at the mock servers given
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

pub struct Upstreams<'a> {
    pub twitter: Option<&'a MockServer>,
    pub openai: Option<&'a MockServer>,
}

impl Upstreams<'_> {
    pub fn none() -> Self {
        Upstreams {
            twitter: None,
            openai: None,
        }
    }
}

pub fn test_config(dir: &TempDir, upstreams: &Upstreams<'_>) -> AppConfig {
    let mut config = AppConfig::development();
    config.storage.data_dir = dir.path().join("data");
    config.storage.max_media_bytes = 1024;
    config.twitter.chunk_size_bytes = 4;
    config.twitter.max_status_polls = 2;
    config.twitter.request_timeout_secs = 5;
    config.openai.request_timeout_secs = 5;

    // No credentials unless a mock is standing in for the upstream
    config.twitter.api_key = None;
    config.twitter.api_secret = None;
    config.twitter.access_token = None;
    config.twitter.access_secret = None;
    config.openai.api_key = None;

    if let Some(server) = upstreams.twitter {
        config.twitter.api_base = server.uri();
        config.twitter.upload_base = server.uri();
        config.twitter.api_key = Some("consumer-key".to_string());
        config.twitter.api_secret = Some("consumer-secret".to_string());
        config.twitter.access_token = Some("access-token".to_string());
        config.twitter.access_secret = Some("access-secret".to_string());
    }
    if let Some(server) = upstreams.openai {
        config.openai.base_url = server.uri();
        config.openai.api_key = Some("sk-test".to_string());
    }
    config
}

pub async fn spawn_app(upstreams: Upstreams<'_>) -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = test_config(&dir, &upstreams);
    let state = AppState::new(config).await.expect("failed to build app state");
    TestApp {
        router: threadcraft::app(state.clone()),
        state,
        dir,
    }
}

impl TestApp {
    /// Fresh state over the same data directory, as after a restart
    pub async fn restart(&self) -> Router {
        let state = AppState::new((*self.state.config).clone())
            .await
            .expect("failed to reopen app state");
        threadcraft::app(state)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        send(&self.router, request).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(empty_request(Method::GET, uri)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(empty_request(Method::DELETE, uri)).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::POST, uri, body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::PUT, uri, body)).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(json_request(Method::PATCH, uri, body)).await
    }

    pub async fn post_file(&self, uri: &str, field: &str, file_name: &str, mime: &str, bytes: &[u8]) -> (StatusCode, Value) {
        self.send(multipart_request(uri, field, file_name, mime, bytes)).await
    }

    /// Creates a thread and returns its id
    pub async fn create_thread(&self, title: &str) -> String {
        let (status, body) = self.post_json("/api/threads", serde_json::json!({ "title": title })).await;
        assert_eq!(status, StatusCode::CREATED, "create thread failed: {}", body);
        body["data"]["id"].as_str().expect("thread id").to_string()
    }

    /// Appends a tweet and returns its id
    pub async fn add_tweet(&self, thread_id: &str, content: &str) -> String {
        let (status, body) = self
            .post_json(
                &format!("/api/threads/{}/tweets", thread_id),
                serde_json::json!({ "content": content }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add tweet failed: {}", body);
        body["data"]["id"].as_str().expect("tweet id").to_string()
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn multipart_request(uri: &str, field: &str, file_name: &str, mime: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            field, file_name, mime
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}
