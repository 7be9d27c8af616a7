use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::store::Thread;
use crate::text::{weighted_len, TWEET_CHAR_LIMIT};
use crate::twitter::{OutgoingTweet, TwitterClient, TwitterError};

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Thread failed validation")]
    Validation { field_errors: HashMap<String, String> },

    #[error("Media upload for tweet {} failed: {source}", .tweet_index + 1)]
    Media {
        tweet_index: usize,
        #[source]
        source: TwitterError,
    },

    #[error(transparent)]
    Twitter(#[from] TwitterError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    pub thread_id: uuid::Uuid,
    pub tweet_ids: Vec<String>,
    pub media_ids: Vec<Vec<String>>,
}

/// Publishes a stored thread: uploads every attachment, then posts the tweets
/// as a reply chain
pub struct PublishService<'a> {
    twitter: &'a TwitterClient,
}

impl<'a> PublishService<'a> {
    pub fn new(twitter: &'a TwitterClient) -> Self {
        Self { twitter }
    }

    pub async fn publish(&self, thread: &Thread) -> Result<PublishReport, PublishError> {
        validate_thread(thread)?;
        if !self.twitter.is_configured() {
            return Err(TwitterError::MissingCredentials.into());
        }

        let mut outgoing = Vec::with_capacity(thread.tweets.len());
        let mut media_ids = Vec::with_capacity(thread.tweets.len());
        for (tweet_index, tweet) in thread.tweets.iter().enumerate() {
            let mut ids = Vec::with_capacity(tweet.media.len());
            for media in &tweet.media {
                let id = self
                    .twitter
                    .upload_media(&media.data, &media.mime_type)
                    .await
                    .map_err(|source| PublishError::Media { tweet_index, source })?;
                ids.push(id);
            }
            outgoing.push(OutgoingTweet {
                text: tweet.content.clone(),
                media_ids: ids.clone(),
            });
            media_ids.push(ids);
        }

        let tweet_ids = self.twitter.post_thread(&outgoing).await?;
        info!(thread_id = %thread.id, tweets = tweet_ids.len(), "Stored thread published");

        Ok(PublishReport {
            thread_id: thread.id,
            tweet_ids,
            media_ids,
        })
    }
}

/// Checks every tweet is postable: non-empty and within the character limit
pub fn validate_thread(thread: &Thread) -> Result<(), PublishError> {
    let mut field_errors = HashMap::new();
    if thread.tweets.is_empty() {
        field_errors.insert("tweets".to_string(), "Thread has no tweets".to_string());
    }

    for (i, tweet) in thread.tweets.iter().enumerate() {
        let key = format!("tweets[{}]", i);
        let len = weighted_len(&tweet.content);
        if tweet.content.trim().is_empty() && tweet.media.is_empty() {
            field_errors.insert(key, "Tweet is empty".to_string());
        } else if len > TWEET_CHAR_LIMIT {
            field_errors.insert(key, format!("Tweet is {} characters, limit is {}", len, TWEET_CHAR_LIMIT));
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(PublishError::Validation { field_errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Tweet;

    fn thread_with(contents: &[&str]) -> Thread {
        let mut thread = Thread::new(Some("t"));
        thread.tweets = contents.iter().map(|c| Tweet::new(*c)).collect();
        thread
    }

    #[test]
    fn empty_thread_is_rejected() {
        let err = validate_thread(&thread_with(&[])).unwrap_err();
        match err {
            PublishError::Validation { field_errors } => assert!(field_errors.contains_key("tweets")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn flags_blank_and_oversized_tweets() {
        let long = "x".repeat(TWEET_CHAR_LIMIT + 1);
        let err = validate_thread(&thread_with(&["fine", "  ", &long])).unwrap_err();
        match err {
            PublishError::Validation { field_errors } => {
                assert_eq!(field_errors.len(), 2);
                assert_eq!(field_errors["tweets[1]"], "Tweet is empty");
                assert!(field_errors["tweets[2]"].contains("281"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn valid_thread_passes() {
        assert!(validate_thread(&thread_with(&["one", "two 🚀"])).is_ok());
    }
}
