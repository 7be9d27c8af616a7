use serde_json::{json, Value};

use crate::cli::client::ServerClient;
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": message
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(output_format: &OutputFormat, collection_name: &str, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    collection_name: []
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output a full thread: title line then numbered tweets
pub fn output_thread(output_format: &OutputFormat, thread: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(thread)?),
        OutputFormat::Text => {
            println!("{} ({})", str_field(thread, "title"), str_field(thread, "id"));
            let tweets = thread.get("tweets").and_then(Value::as_array).cloned().unwrap_or_default();
            if tweets.is_empty() {
                println!("  (no tweets)");
            }
            for (n, tweet) in tweets.iter().enumerate() {
                let media = tweet.get("media").and_then(Value::as_array).map_or(0, Vec::len);
                let suffix = if media > 0 { format!(" [{} media]", media) } else { String::new() };
                println!("  {}. {}{}", n + 1, str_field(tweet, "content"), suffix);
                println!("     id: {}", str_field(tweet, "id"));
            }
        }
    }
    Ok(())
}

pub fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Thread id from the argument, or the server's current thread
pub async fn resolve_thread_id(client: &ServerClient, provided: Option<String>) -> anyhow::Result<String> {
    match provided {
        Some(id) => Ok(id),
        None => {
            let current = client
                .get("/api/threads/current")
                .await
                .map_err(|_| anyhow::anyhow!("No current thread set; pass --thread or run `thread use`"))?;
            Ok(str_field(&current, "id").to_string())
        }
    }
}

/// Accepts a tweet id or a 1-based position within the thread
pub async fn resolve_tweet_id(client: &ServerClient, thread_id: &str, selector: &str) -> anyhow::Result<String> {
    let Ok(position) = selector.parse::<usize>() else {
        return Ok(selector.to_string());
    };

    let thread = client.get(&format!("/api/threads/{}", thread_id)).await?;
    let tweets = thread.get("tweets").and_then(Value::as_array).cloned().unwrap_or_default();
    position
        .checked_sub(1)
        .and_then(|index| tweets.get(index))
        .map(|tweet| str_field(tweet, "id").to_string())
        .ok_or_else(|| anyhow::anyhow!("Thread has {} tweets; no tweet at position {}", tweets.len(), position))
}
