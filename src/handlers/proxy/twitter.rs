use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::twitter::OutgoingTweet;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadPosted {
    pub message: &'static str,
    pub tweet_ids: Vec<String>,
}

/// POST /api/twitter - `{ "tweets": [{ "content": "...", "mediaIds": [...] }] }`
pub async fn post_thread(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<ThreadPosted> {
    let Json(body) = payload?;
    let tweets = outgoing_tweets(&body)?;

    let tweet_ids = state
        .twitter
        .post_thread(&tweets)
        .await
        .map_err(|e| ApiError::twitter("Failed to post thread to Twitter", e))?;

    Ok(ApiResponse::success(ThreadPosted {
        message: "Thread posted successfully",
        tweet_ids,
    }))
}

fn outgoing_tweets(body: &Value) -> Result<Vec<OutgoingTweet>, ApiError> {
    let items = body
        .get("tweets")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ApiError::bad_request("Invalid request: tweets array is required"))?;

    Ok(items
        .iter()
        .map(|item| OutgoingTweet {
            text: item.get("content").and_then(Value::as_str).unwrap_or_default().to_string(),
            media_ids: item
                .get("mediaIds")
                .and_then(Value::as_array)
                .map(|ids| ids.iter().filter_map(Value::as_str).map(str::to_string).collect())
                .unwrap_or_default(),
        })
        .collect())
}
