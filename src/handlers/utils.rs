use axum::extract::Multipart;

use crate::error::ApiError;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file part pulled out of a multipart body
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Reads the multipart field named `field_name`, skipping any others
pub async fn read_file_field(multipart: &mut Multipart, field_name: &str) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let mime_type = field
            .content_type()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();
        let data = field.bytes().await?.to_vec();

        return Ok(Some(UploadedFile {
            file_name,
            mime_type,
            data,
        }));
    }
    Ok(None)
}
