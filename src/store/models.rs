use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::text::truncate_chars;

pub const DEFAULT_THREAD_TITLE: &str = "Untitled Thread";
pub const MAX_TITLE_CHARS: usize = 20;
pub const MAX_MEDIA_PER_TWEET: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub media: Vec<MediaAttachment>,
}

impl Tweet {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            media: Vec::new(),
        }
    }
}

/// A file attached to a tweet, stored inline so a thread survives restarts
/// without a separate blob store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttachment {
    pub id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
    pub sha256: String,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl MediaAttachment {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        let digest = Sha256::digest(&data);
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size: data.len(),
            sha256: format!("{:x}", digest),
            data,
        }
    }

    /// Recomputes `size` and `sha256` from the payload, keeping the id
    pub fn resealed(self) -> Self {
        let Self { id, file_name, mime_type, data, .. } = self;
        Self {
            id,
            ..Self::new(file_name, mime_type, data)
        }
    }
}

/// Attachment metadata without the payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
    pub sha256: String,
}

impl From<&MediaAttachment> for MediaInfo {
    fn from(media: &MediaAttachment) -> Self {
        Self {
            id: media.id,
            file_name: media.file_name.clone(),
            mime_type: media.mime_type.clone(),
            size: media.size,
            sha256: media.sha256.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: Uuid,
    pub title: String,
    pub tweets: Vec<Tweet>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    pub fn new(title: Option<&str>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: normalize_title(title.unwrap_or(DEFAULT_THREAD_TITLE)),
            tweets: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn tweet_index(&self, tweet_id: Uuid) -> Option<usize> {
        self.tweets.iter().position(|t| t.id == tweet_id)
    }

    pub fn summary(&self) -> ThreadSummary {
        ThreadSummary {
            id: self.id,
            title: self.title.clone(),
            tweet_count: self.tweets.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Listing view of a thread without tweet bodies or media payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub id: Uuid,
    pub title: String,
    pub tweet_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadState {
    pub threads: Vec<Thread>,
    pub current_thread_id: Option<Uuid>,
}

pub fn normalize_title(title: &str) -> String {
    truncate_chars(title, MAX_TITLE_CHARS)
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded.as_bytes()).map_err(serde::de::Error::custom)
    }
}
