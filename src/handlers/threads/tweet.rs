use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::store::{Thread, Tweet};

#[derive(Debug, Default, Deserialize)]
pub struct TweetContentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveTweetRequest {
    pub position: usize,
}

/// POST /api/threads/:id/tweets
pub async fn add(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TweetContentRequest>, JsonRejection>,
) -> ApiResult<Tweet> {
    let Path(thread_id) = path?;
    let request = match payload {
        Ok(Json(request)) => request,
        // The editor appends blank tweets before anything is typed
        Err(JsonRejection::MissingJsonContentType(_)) => TweetContentRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    Ok(ApiResponse::created(state.store.add_tweet(thread_id, request.content).await?))
}

/// PATCH /api/threads/:id/tweets/:tweet_id
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    payload: Result<Json<TweetContentRequest>, JsonRejection>,
) -> ApiResult<Tweet> {
    let Path((thread_id, tweet_id)) = path?;
    let Json(request) = payload?;
    Ok(ApiResponse::success(
        state.store.update_tweet(thread_id, tweet_id, request.content).await?,
    ))
}

/// DELETE /api/threads/:id/tweets/:tweet_id
pub async fn remove(State(state): State<AppState>, path: Result<Path<(Uuid, Uuid)>, PathRejection>) -> ApiResult<()> {
    let Path((thread_id, tweet_id)) = path?;
    state.store.remove_tweet(thread_id, tweet_id).await?;
    Ok(ApiResponse::no_content())
}

/// PUT /api/threads/:id/tweets/:tweet_id/position - `{ "position": 0 }`
pub async fn reposition(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    payload: Result<Json<MoveTweetRequest>, JsonRejection>,
) -> ApiResult<Thread> {
    let Path((thread_id, tweet_id)) = path?;
    let Json(request) = payload?;
    Ok(ApiResponse::success(
        state.store.move_tweet_to(thread_id, tweet_id, request.position).await?,
    ))
}
