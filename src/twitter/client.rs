use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::TwitterError;
use crate::config::TwitterConfig;
use crate::oauth::{Credentials, OAuthSigner};

const USER_AGENT: &str = concat!("threadcraft/", env!("CARGO_PKG_VERSION"));

/// Signed client for the v1.1 media upload and v2 tweet endpoints
#[derive(Debug, Clone)]
pub struct TwitterClient {
    http: reqwest::Client,
    signer: Option<OAuthSigner>,
    pub(crate) api_base: String,
    pub(crate) upload_base: String,
    pub(crate) chunk_size: usize,
    pub(crate) max_status_polls: u32,
}

impl TwitterClient {
    pub fn new(config: &TwitterConfig) -> Result<Self, TwitterError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let signer = match (
            &config.api_key,
            &config.api_secret,
            &config.access_token,
            &config.access_secret,
        ) {
            (Some(key), Some(secret), Some(token), Some(token_secret)) => Some(OAuthSigner::new(Credentials {
                consumer_key: key.clone(),
                consumer_secret: secret.clone(),
                access_token: token.clone(),
                access_secret: token_secret.clone(),
            })),
            _ => {
                tracing::warn!("Twitter credentials incomplete; publishing and media upload are disabled");
                None
            }
        };

        Ok(Self {
            http,
            signer,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_base: config.upload_base.trim_end_matches('/').to_string(),
            chunk_size: config.chunk_size_bytes.max(1),
            max_status_polls: config.max_status_polls,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.signer.is_some()
    }

    /// Request carrying a freshly signed Authorization header
    pub(crate) fn signed(&self, method: Method, url: &str) -> Result<RequestBuilder, TwitterError> {
        let signer = self.signer.as_ref().ok_or(TwitterError::MissingCredentials)?;
        let header = signer.authorization_header(method.as_str(), url, &[])?;
        Ok(self
            .http
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, header))
    }

    /// Decodes a 2xx JSON body or turns the upstream error body into `TwitterError::Api`
    pub(crate) async fn read_json<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T, TwitterError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(operation, &body).unwrap_or_else(|| fallback_message(operation).to_string());
            tracing::error!(operation, status = status.as_u16(), body = %body, "Twitter API error");
            return Err(TwitterError::Api {
                operation,
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TwitterError::Parse(format!("{}: {}", operation, e)))
    }
}

/// Pulls a human message out of the assorted Twitter error shapes.
/// The v1.1 upload endpoint reports `error`, the v2 tweet endpoint `detail`.
pub(crate) fn upstream_message(operation: &str, body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let (first, second) = if is_media_operation(operation) {
        ("error", "detail")
    } else {
        ("detail", "error")
    };
    let candidates = [
        value.get(first),
        value.get(second),
        value.get("title"),
        value.pointer("/errors/0/message"),
    ];
    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().map(str::to_string))
        .filter(|m| !m.is_empty());
    message
}

fn is_media_operation(operation: &str) -> bool {
    matches!(operation, "INIT" | "APPEND" | "FINALIZE" | "STATUS")
}

fn fallback_message(operation: &str) -> &'static str {
    match operation {
        "INIT" => "Failed to initialize media upload",
        "APPEND" => "Failed to upload media chunk",
        "FINALIZE" => "Failed to finalize media upload",
        "STATUS" => "Failed to check media processing status",
        _ => "Failed to post tweet",
    }
}
