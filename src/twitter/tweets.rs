use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::{TwitterClient, TwitterError};

pub const TWEETS_PATH: &str = "/2/tweets";

/// One tweet of a thread about to be published
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingTweet {
    pub text: String,
    #[serde(default)]
    pub media_ids: Vec<String>,
}

impl OutgoingTweet {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            media_ids: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<ReplySettings<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<MediaSettings<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplySettings<'a> {
    in_reply_to_tweet_id: &'a str,
}

#[derive(Debug, Serialize)]
struct MediaSettings<'a> {
    media_ids: &'a [String],
}

#[derive(Debug, Deserialize)]
struct CreateTweetResponse {
    data: CreatedTweet,
}

#[derive(Debug, Deserialize)]
struct CreatedTweet {
    id: String,
}

impl TwitterClient {
    /// POST /2/tweets, returning the new tweet id
    pub async fn post_tweet(
        &self,
        text: &str,
        reply_to: Option<&str>,
        media_ids: &[String],
    ) -> Result<String, TwitterError> {
        let body = CreateTweetRequest {
            text,
            reply: reply_to.map(|id| ReplySettings { in_reply_to_tweet_id: id }),
            media: (!media_ids.is_empty()).then_some(MediaSettings { media_ids }),
        };

        let url = format!("{}{}", self.api_base, TWEETS_PATH);
        let response = self.signed(Method::POST, &url)?.json(&body).send().await?;
        let created: CreateTweetResponse = Self::read_json("CREATE_TWEET", response).await?;
        Ok(created.data.id)
    }

    /// Posts the first tweet standalone and chains every following tweet as a
    /// reply to the one before it. Stops at the first failure.
    pub async fn post_thread(&self, tweets: &[OutgoingTweet]) -> Result<Vec<String>, TwitterError> {
        if tweets.is_empty() {
            return Err(TwitterError::EmptyThread);
        }

        let mut posted: Vec<String> = Vec::with_capacity(tweets.len());
        for (index, tweet) in tweets.iter().enumerate() {
            let reply_to = posted.last().map(String::as_str);
            match self.post_tweet(&tweet.text, reply_to, &tweet.media_ids).await {
                Ok(id) => {
                    info!(index, tweet_id = %id, "Tweet posted");
                    posted.push(id);
                }
                Err(e) if posted.is_empty() => return Err(e),
                Err(e) => {
                    error!(index, posted = posted.len(), error = %e, "Thread publishing stopped");
                    return Err(TwitterError::PartialThread {
                        posted,
                        source: Box::new(e),
                    });
                }
            }
        }

        info!(count = posted.len(), "Thread posted successfully");
        Ok(posted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_and_media_are_omitted_when_absent() {
        let body = CreateTweetRequest {
            text: "hello",
            reply: None,
            media: None,
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "text": "hello" }));
    }

    #[test]
    fn reply_body_shape() {
        let ids = vec!["11".to_string()];
        let body = CreateTweetRequest {
            text: "next",
            reply: Some(ReplySettings { in_reply_to_tweet_id: "42" }),
            media: Some(MediaSettings { media_ids: &ids }),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "text": "next",
                "reply": { "in_reply_to_tweet_id": "42" },
                "media": { "media_ids": ["11"] }
            })
        );
    }
}
