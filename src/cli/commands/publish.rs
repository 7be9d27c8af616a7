use clap::Args;
use serde_json::{json, Value};

use crate::cli::client::ServerClient;
use crate::cli::utils::{output_success, resolve_thread_id};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct PublishArgs {
    #[arg(long, help = "Thread ID (defaults to current thread)")]
    pub thread: Option<String>,
}

pub async fn handle(args: PublishArgs, client: &ServerClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let thread_id = resolve_thread_id(client, args.thread).await?;
    let report = client
        .post(&format!("/api/threads/{}/publish", thread_id), &json!({}))
        .await?;

    let tweet_ids: Vec<&str> = report
        .get("tweetIds")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if let OutputFormat::Text = output_format {
        for (n, id) in tweet_ids.iter().enumerate() {
            println!("  {}. https://twitter.com/i/web/status/{}", n + 1, id);
        }
    }
    let message = format!("Posted {} tweets", tweet_ids.len());
    output_success(&output_format, &message, Some(json!({ "report": report })))
}
