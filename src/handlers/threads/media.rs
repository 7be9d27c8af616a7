use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::{Multipart, Path, State};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::utils::read_file_field;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::store::{MediaAttachment, MediaInfo};

/// POST /api/threads/:id/tweets/:tweet_id/media - multipart `file`
pub async fn attach(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<MediaInfo> {
    let Path((thread_id, tweet_id)) = path?;
    let mut multipart = multipart?;
    let file = read_file_field(&mut multipart, "file")
        .await?
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;

    info!(
        thread_id = %thread_id,
        tweet_id = %tweet_id,
        name = %file.file_name,
        mime_type = %file.mime_type,
        size = file.data.len(),
        "Attaching media"
    );

    let media = MediaAttachment::new(file.file_name, file.mime_type, file.data);
    let stored = state.store.attach_media(thread_id, tweet_id, media).await?;
    Ok(ApiResponse::created(MediaInfo::from(&stored)))
}

/// DELETE /api/threads/:id/tweets/:tweet_id/media/:media_id
pub async fn detach(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid, Uuid)>, PathRejection>,
) -> ApiResult<()> {
    let Path((thread_id, tweet_id, media_id)) = path?;
    state.store.detach_media(thread_id, tweet_id, media_id).await?;
    Ok(ApiResponse::no_content())
}
