// HTTP API Error Types
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::services::PublishError;
use crate::store::StoreError;
use crate::suggest::SuggestError;
use crate::twitter::TwitterError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: Option<HashMap<String, String>>,
    },
    InvalidJson(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (Twitter / OpenAI failures)
    BadGateway {
        message: String,
        details: String,
        posted_tweet_ids: Vec<String>,
    },

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::InternalServerError(_) => 500,
            ApiError::BadGateway { .. } => 502,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway { message, .. } => message,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::InvalidJson(_) => "INVALID_JSON",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::BadGateway { .. } => "BAD_GATEWAY",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { message, field_errors } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "VALIDATION_ERROR"
                });

                if let Some(field_errors) = field_errors {
                    response["field_errors"] = json!(field_errors);
                }

                response
            }
            ApiError::BadGateway {
                message,
                details,
                posted_tweet_ids,
            } => {
                let mut response = json!({
                    "error": true,
                    "message": message,
                    "code": "BAD_GATEWAY",
                    "details": details
                });

                // Tweets that went live before the failure; retrying them would double-post
                if !posted_tweet_ids.is_empty() {
                    response["postedTweetIds"] = json!(posted_tweet_ids);
                }

                response
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code()
                })
            }
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: Option<HashMap<String, String>>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn field_error(field: &str, problem: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), problem.into());
        ApiError::validation_error("Invalid field value", Some(field_errors))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::BadGateway {
            message: message.into(),
            details: details.into(),
            posted_tweet_ids: Vec::new(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }

    /// Maps a Twitter failure, naming the operation that failed
    pub fn twitter(operation: &str, err: TwitterError) -> Self {
        match err {
            TwitterError::MissingCredentials => ApiError::service_unavailable("Twitter credentials are not configured"),
            TwitterError::EmptyThread => ApiError::bad_request("Invalid request: tweets array is required"),
            other => {
                tracing::error!("{}: {}", operation, other);
                let details = other.root_message();
                let posted_tweet_ids = match other {
                    TwitterError::PartialThread { posted, .. } => posted,
                    _ => Vec::new(),
                };
                ApiError::BadGateway {
                    message: operation.to_string(),
                    details,
                    posted_tweet_ids,
                }
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::ThreadNotFound(_)
            | StoreError::TweetNotFound { .. }
            | StoreError::MediaNotFound { .. } => ApiError::not_found(message),
            StoreError::InvalidPosition { .. } => ApiError::field_error("position", message),
            StoreError::DuplicateTweet(_) => ApiError::Conflict(message),
            StoreError::TooManyAttachments { .. } => ApiError::validation_error(message, None),
            StoreError::MediaTooLarge { .. } => ApiError::PayloadTooLarge(message),
            StoreError::Corrupt(e) => {
                // Don't expose storage internals to clients
                tracing::error!("Thread storage corrupt: {}", e);
                ApiError::internal_server_error("Thread storage is unreadable")
            }
            StoreError::Io(e) => {
                tracing::error!("Thread storage I/O error: {}", e);
                ApiError::internal_server_error("Failed to persist thread storage")
            }
        }
    }
}

impl From<SuggestError> for ApiError {
    fn from(err: SuggestError) -> Self {
        match err {
            SuggestError::MissingApiKey => ApiError::service_unavailable("OpenAI API key is not configured"),
            other => {
                tracing::error!("Error in suggestions API: {}", other);
                ApiError::bad_gateway("Failed to generate suggestions", other.to_string())
            }
        }
    }
}

impl From<PublishError> for ApiError {
    fn from(err: PublishError) -> Self {
        match err {
            PublishError::Validation { field_errors } => {
                ApiError::validation_error("Thread is not ready to publish", Some(field_errors))
            }
            PublishError::Media { tweet_index, source } => {
                ApiError::twitter(&format!("Failed to upload media for tweet {}", tweet_index + 1), source)
            }
            PublishError::Twitter(e) => ApiError::twitter("Failed to post thread to Twitter", e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return ApiError::PayloadTooLarge(err.body_text());
        }
        ApiError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
