use std::time::Duration;

use anyhow::anyhow;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// Thin HTTP client for a running threadcraft server
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    base: String,
}

impl ServerClient {
    pub fn new(server: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(Duration::from_secs(120)).build()?;
        Ok(Self {
            http,
            base: server.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.send(self.http.request(Method::GET, self.url(path))).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.send(self.http.request(Method::DELETE, self.url(path))).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.http.request(Method::POST, self.url(path)).json(body)).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.http.request(Method::PUT, self.url(path)).json(body)).await
    }

    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.http.request(Method::PATCH, self.url(path)).json(body)).await
    }

    /// Unwraps the `{success, data}` envelope, turning error bodies into `anyhow` errors
    async fn send(&self, request: RequestBuilder) -> anyhow::Result<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| anyhow!("cannot reach server at {}: {}", self.base, e))?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        if status.is_success() {
            return Ok(body.get("data").cloned().unwrap_or(body));
        }
        Err(anyhow!(error_text(status, &body)))
    }
}

fn error_text(status: StatusCode, body: &Value) -> String {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"));

    let mut text = match body.get("details").and_then(Value::as_str) {
        Some(details) => format!("{} ({}): {}", message, status.as_u16(), details),
        None => format!("{} ({})", message, status.as_u16()),
    };
    if let Some(posted) = body.get("postedTweetIds").and_then(Value::as_array) {
        let ids: Vec<&str> = posted.iter().filter_map(Value::as_str).collect();
        if !ids.is_empty() {
            text.push_str(&format!("; already posted: {}", ids.join(", ")));
        }
    }
    text
}
