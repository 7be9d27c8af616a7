use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::suggest::{Suggestion, SuggestionRequest, PRESET_PROMPTS};

#[derive(Debug, Serialize)]
pub struct SuggestionList {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Serialize)]
pub struct PromptList {
    pub prompts: Vec<&'static str>,
}

/// POST /api/suggestions - `{ "text", "prompt", "threadContext" }`
pub async fn suggest(
    State(state): State<AppState>,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> ApiResult<SuggestionList> {
    let Json(request) = payload?;
    let suggestions = state.suggestions.suggest(&request).await?;
    Ok(ApiResponse::success(SuggestionList { suggestions }))
}

/// GET /api/suggestions/prompts
pub async fn prompts() -> ApiResult<PromptList> {
    Ok(ApiResponse::success(PromptList {
        prompts: PRESET_PROMPTS.to_vec(),
    }))
}
