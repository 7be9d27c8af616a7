use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, info};

use super::{TwitterClient, TwitterError};

pub const MEDIA_UPLOAD_PATH: &str = "/1.1/media/upload.json";

#[derive(Debug, Deserialize)]
struct InitResponse {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct FinalizeResponse {
    media_id_string: String,
    #[serde(default)]
    processing_info: Option<ProcessingInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProcessingInfo {
    state: String,
    #[serde(default)]
    check_after_secs: Option<u64>,
    #[serde(default)]
    progress_percent: Option<u32>,
    #[serde(default)]
    error: Option<ProcessingError>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProcessingError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    processing_info: Option<ProcessingInfo>,
}

/// Upload category Twitter uses to route asynchronous processing
pub fn media_category(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        "image/gif" => Some("tweet_gif"),
        m if m.starts_with("video/") => Some("tweet_video"),
        m if m.starts_with("image/") => Some("tweet_image"),
        _ => None,
    }
}

impl TwitterClient {
    fn upload_url(&self) -> String {
        format!("{}{}", self.upload_base, MEDIA_UPLOAD_PATH)
    }

    /// Chunked upload: INIT, one APPEND per chunk, FINALIZE, then STATUS polling
    /// while Twitter is still processing. Returns the `media_id_string`.
    pub async fn upload_media(&self, data: &[u8], mime_type: &str) -> Result<String, TwitterError> {
        info!(mime_type, size = data.len(), "Initializing media upload");
        let media_id = self.init_upload(data.len(), mime_type).await?;

        let chunks: Vec<&[u8]> = data.chunks(self.chunk_size).collect();
        info!(media_id = %media_id, total_chunks = chunks.len(), chunk_size = self.chunk_size, "Uploading media in chunks");
        for (index, chunk) in chunks.into_iter().enumerate() {
            self.append_chunk(&media_id, index, chunk, mime_type).await?;
        }

        let finalized = self.finalize_upload(&media_id).await?;
        if let Some(processing) = finalized.processing_info {
            self.await_processing(&media_id, processing).await?;
        }

        info!(media_id = %media_id, "Media upload completed");
        Ok(finalized.media_id_string)
    }

    async fn init_upload(&self, total_bytes: usize, mime_type: &str) -> Result<String, TwitterError> {
        let mut form = Form::new()
            .text("command", "INIT")
            .text("total_bytes", total_bytes.to_string())
            .text("media_type", mime_type.to_string());
        if let Some(category) = media_category(mime_type) {
            form = form.text("media_category", category);
        }

        let response = self.signed(Method::POST, &self.upload_url())?.multipart(form).send().await?;
        let init: InitResponse = Self::read_json("INIT", response).await?;
        debug!(media_id = %init.media_id_string, "Media upload initialized");
        Ok(init.media_id_string)
    }

    async fn append_chunk(
        &self,
        media_id: &str,
        segment_index: usize,
        chunk: &[u8],
        mime_type: &str,
    ) -> Result<(), TwitterError> {
        debug!(index = segment_index, size = chunk.len(), "Uploading chunk");

        let part = Part::bytes(chunk.to_vec()).file_name("blob").mime_str(mime_type)?;
        let form = Form::new()
            .text("command", "APPEND")
            .text("media_id", media_id.to_string())
            .text("segment_index", segment_index.to_string())
            .part("media", part);

        let response = self.signed(Method::POST, &self.upload_url())?.multipart(form).send().await?;
        let status = response.status();
        if status.is_success() {
            // APPEND answers 204 with an empty body
            return Ok(());
        }
        Self::read_json::<serde_json::Value>("APPEND", response).await.map(|_| ())
    }

    async fn finalize_upload(&self, media_id: &str) -> Result<FinalizeResponse, TwitterError> {
        let form = Form::new()
            .text("command", "FINALIZE")
            .text("media_id", media_id.to_string());

        let response = self.signed(Method::POST, &self.upload_url())?.multipart(form).send().await?;
        Self::read_json("FINALIZE", response).await
    }

    async fn await_processing(&self, media_id: &str, mut processing: ProcessingInfo) -> Result<(), TwitterError> {
        let mut polls = 0;
        loop {
            match processing.state.as_str() {
                "succeeded" => return Ok(()),
                "failed" => {
                    let message = processing
                        .error
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| "media processing failed".to_string());
                    return Err(TwitterError::MediaProcessing(message));
                }
                _ => {}
            }

            if polls >= self.max_status_polls {
                return Err(TwitterError::MediaProcessing(format!(
                    "media {} still {} after {} status checks",
                    media_id, processing.state, polls
                )));
            }
            polls += 1;

            let wait = processing.check_after_secs.unwrap_or(1);
            debug!(media_id, state = %processing.state, progress = ?processing.progress_percent, wait, "Media still processing");
            tokio::time::sleep(Duration::from_secs(wait)).await;

            processing = match self.check_status(media_id).await? {
                Some(next) => next,
                // No processing_info means nothing left to wait for
                None => return Ok(()),
            };
        }
    }

    async fn check_status(&self, media_id: &str) -> Result<Option<ProcessingInfo>, TwitterError> {
        let url = url::Url::parse_with_params(&self.upload_url(), &[("command", "STATUS"), ("media_id", media_id)])
            .map_err(|e| TwitterError::Parse(e.to_string()))?;
        let response = self.signed(Method::GET, url.as_str())?.send().await?;
        let status: StatusResponse = Self::read_json("STATUS", response).await?;
        Ok(status.processing_info)
    }
}
