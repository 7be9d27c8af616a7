use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::store::{Thread, ThreadSummary, Tweet};

#[derive(Debug, Default, Deserialize)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceTweetsRequest {
    pub tweets: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
pub struct RenameThreadRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectThreadRequest {
    pub thread_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadList {
    pub threads: Vec<ThreadSummary>,
    pub current_thread_id: Option<Uuid>,
}

/// GET /api/threads
pub async fn list(State(state): State<AppState>) -> ApiResult<ThreadList> {
    let threads = state.store.list_threads().await;
    let current_thread_id = state.store.current_thread().await.map(|t| t.id);
    Ok(ApiResponse::success(ThreadList {
        threads,
        current_thread_id,
    }))
}

/// POST /api/threads - body is optional, `{ "title": "..." }`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateThreadRequest>, JsonRejection>,
) -> ApiResult<Thread> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateThreadRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };

    let thread = state.store.create_thread(request.title.as_deref()).await?;
    Ok(ApiResponse::created(thread))
}

/// GET /api/threads/:id
pub async fn get(State(state): State<AppState>, path: Result<Path<Uuid>, PathRejection>) -> ApiResult<Thread> {
    let Path(thread_id) = path?;
    Ok(ApiResponse::success(state.store.get_thread(thread_id).await?))
}

/// PUT /api/threads/:id - replace the tweet list
pub async fn put(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ReplaceTweetsRequest>, JsonRejection>,
) -> ApiResult<Thread> {
    let Path(thread_id) = path?;
    let Json(request) = payload?;
    Ok(ApiResponse::success(state.store.update_thread(thread_id, request.tweets).await?))
}

/// PATCH /api/threads/:id - rename
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<RenameThreadRequest>, JsonRejection>,
) -> ApiResult<Thread> {
    let Path(thread_id) = path?;
    let Json(request) = payload?;
    Ok(ApiResponse::success(
        state.store.update_thread_title(thread_id, &request.title).await?,
    ))
}

/// DELETE /api/threads/:id
pub async fn delete(State(state): State<AppState>, path: Result<Path<Uuid>, PathRejection>) -> ApiResult<()> {
    let Path(thread_id) = path?;
    state.store.delete_thread(thread_id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /api/threads/current
pub async fn current_get(State(state): State<AppState>) -> ApiResult<Thread> {
    state
        .store
        .current_thread()
        .await
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found("No thread selected"))
}

/// PUT /api/threads/current - `{ "threadId": "..." }`
pub async fn current_put(
    State(state): State<AppState>,
    payload: Result<Json<SelectThreadRequest>, JsonRejection>,
) -> ApiResult<Thread> {
    let Json(request) = payload?;
    Ok(ApiResponse::success(state.store.set_current_thread(request.thread_id).await?))
}
