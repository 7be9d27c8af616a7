pub mod models;
pub mod persist;
pub mod repository;

pub use models::{MediaAttachment, MediaInfo, Thread, ThreadState, ThreadSummary, Tweet};
pub use persist::StateFile;
pub use repository::ThreadStore;

use thiserror::Error;
use uuid::Uuid;

/// Errors from the thread store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Thread not found: {0}")]
    ThreadNotFound(Uuid),

    #[error("Tweet {tweet_id} not found in thread {thread_id}")]
    TweetNotFound { thread_id: Uuid, tweet_id: Uuid },

    #[error("Media {media_id} not found on tweet {tweet_id}")]
    MediaNotFound { tweet_id: Uuid, media_id: Uuid },

    #[error("Position {position} is out of range for a thread of {len} tweets")]
    InvalidPosition { position: usize, len: usize },

    #[error("Duplicate tweet id in thread: {0}")]
    DuplicateTweet(Uuid),

    #[error("A tweet can carry at most {max} attachments")]
    TooManyAttachments { max: usize },

    #[error("Attachment of {size} bytes exceeds the {max} byte limit")]
    MediaTooLarge { size: usize, max: usize },

    #[error("Corrupt store file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
