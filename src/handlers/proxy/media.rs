use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::handlers::utils::read_file_field;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploaded {
    pub media_id: String,
}

/// POST /api/media - multipart `file`, uploaded to Twitter in chunks
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<MediaUploaded> {
    let mut multipart = multipart?;
    let file = read_file_field(&mut multipart, "file")
        .await?
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;

    info!(
        mime_type = %file.mime_type,
        size = file.data.len(),
        name = %file.file_name,
        "Processing media upload"
    );

    let media_id = state
        .twitter
        .upload_media(&file.data, &file.mime_type)
        .await
        .map_err(|e| ApiError::twitter("Failed to upload media", e))?;

    Ok(ApiResponse::success(MediaUploaded { media_id }))
}
