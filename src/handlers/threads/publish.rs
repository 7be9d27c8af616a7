use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::handlers::proxy::suggestions::SuggestionList;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{PublishReport, PublishService};
use crate::state::AppState;
use crate::suggest::SuggestionRequest;
use crate::text::thread_context;

/// POST /api/threads/:id/publish
pub async fn publish(State(state): State<AppState>, path: Result<Path<Uuid>, PathRejection>) -> ApiResult<PublishReport> {
    let Path(thread_id) = path?;
    let thread = state.store.get_thread(thread_id).await?;

    info!(thread_id = %thread.id, tweets = thread.tweets.len(), "Publishing stored thread");
    let report = PublishService::new(&state.twitter).publish(&thread).await?;
    Ok(ApiResponse::success(report))
}

#[derive(Debug, Deserialize)]
pub struct ThreadSuggestionRequest {
    pub text: String,
    pub prompt: String,
}

/// POST /api/threads/:id/suggestions - rewrite help with the stored thread as context
pub async fn suggestions(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ThreadSuggestionRequest>, JsonRejection>,
) -> ApiResult<SuggestionList> {
    let Path(thread_id) = path?;
    let Json(request) = payload?;
    let thread = state.store.get_thread(thread_id).await?;

    let request = SuggestionRequest {
        text: request.text,
        prompt: request.prompt,
        thread_context: thread_context(&thread.tweets),
    };
    let suggestions = state.suggestions.suggest(&request).await?;
    Ok(ApiResponse::success(SuggestionList { suggestions }))
}
