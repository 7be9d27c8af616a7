use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ServerClient;
use crate::cli::utils::{output_success, resolve_thread_id, resolve_tweet_id};
use crate::cli::OutputFormat;
use crate::text::{exceeds_limit, weighted_len, TWEET_CHAR_LIMIT};

#[derive(Subcommand)]
pub enum TweetCommands {
    #[command(about = "Append a tweet")]
    Add {
        #[arg(help = "Tweet text")]
        content: String,
        #[arg(long, help = "Thread ID (defaults to current thread)")]
        thread: Option<String>,
    },

    #[command(about = "Replace a tweet's text")]
    Edit {
        #[arg(help = "Tweet ID or 1-based position")]
        tweet: String,
        #[arg(help = "New tweet text")]
        content: String,
        #[arg(long, help = "Thread ID (defaults to current thread)")]
        thread: Option<String>,
    },

    #[command(about = "Remove a tweet")]
    Remove {
        #[arg(help = "Tweet ID or 1-based position")]
        tweet: String,
        #[arg(long, help = "Thread ID (defaults to current thread)")]
        thread: Option<String>,
    },

    #[command(about = "Move a tweet to a new 1-based position")]
    Move {
        #[arg(help = "Tweet ID or 1-based position")]
        tweet: String,
        #[arg(help = "Target position")]
        position: usize,
        #[arg(long, help = "Thread ID (defaults to current thread)")]
        thread: Option<String>,
    },
}

pub async fn handle(cmd: TweetCommands, client: &ServerClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TweetCommands::Add { content, thread } => {
            let thread_id = resolve_thread_id(client, thread).await?;
            warn_if_long(&content);
            let tweet = client
                .post(&format!("/api/threads/{}/tweets", thread_id), &json!({ "content": content }))
                .await?;
            output_success(&output_format, "Tweet added", Some(json!({ "tweet": tweet })))
        }
        TweetCommands::Edit { tweet, content, thread } => {
            let thread_id = resolve_thread_id(client, thread).await?;
            let tweet_id = resolve_tweet_id(client, &thread_id, &tweet).await?;
            warn_if_long(&content);
            let tweet = client
                .patch(
                    &format!("/api/threads/{}/tweets/{}", thread_id, tweet_id),
                    &json!({ "content": content }),
                )
                .await?;
            output_success(&output_format, "Tweet updated", Some(json!({ "tweet": tweet })))
        }
        TweetCommands::Remove { tweet, thread } => {
            let thread_id = resolve_thread_id(client, thread).await?;
            let tweet_id = resolve_tweet_id(client, &thread_id, &tweet).await?;
            client
                .delete(&format!("/api/threads/{}/tweets/{}", thread_id, tweet_id))
                .await?;
            output_success(&output_format, "Tweet removed", None)
        }
        TweetCommands::Move { tweet, position, thread } => {
            let to = position
                .checked_sub(1)
                .ok_or_else(|| anyhow::anyhow!("Positions start at 1"))?;
            let thread_id = resolve_thread_id(client, thread).await?;
            let tweet_id = resolve_tweet_id(client, &thread_id, &tweet).await?;
            client
                .put(
                    &format!("/api/threads/{}/tweets/{}/position", thread_id, tweet_id),
                    &json!({ "position": to }),
                )
                .await?;
            output_success(&output_format, &format!("Tweet moved to position {}", position), None)
        }
    }
}

fn warn_if_long(content: &str) {
    if exceeds_limit(content) {
        eprintln!(
            "Warning: tweet is {} characters (limit {}); publishing will reject it",
            weighted_len(content),
            TWEET_CHAR_LIMIT
        );
    }
}
