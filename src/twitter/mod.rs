pub mod client;
pub mod media;
pub mod tweets;

pub use client::TwitterClient;
pub use media::{media_category, MEDIA_UPLOAD_PATH};
pub use tweets::{OutgoingTweet, TWEETS_PATH};

use thiserror::Error;

use crate::oauth::OAuthError;

/// Twitter client errors
#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("Twitter credentials are not configured")]
    MissingCredentials,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Signing error: {0}")]
    Signing(#[from] OAuthError),

    #[error("Media processing failed: {0}")]
    MediaProcessing(String),

    #[error("Thread has no tweets")]
    EmptyThread,

    #[error("{source} (after posting {} tweets)", .posted.len())]
    PartialThread {
        posted: Vec<String>,
        #[source]
        source: Box<TwitterError>,
    },
}

impl TwitterError {
    /// Upstream message without the partial-thread wrapper
    pub fn root_message(&self) -> String {
        match self {
            TwitterError::PartialThread { source, .. } => source.root_message(),
            other => other.to_string(),
        }
    }
}
