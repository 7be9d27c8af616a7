use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ServerClient;
use crate::cli::utils::{output_empty_collection, output_success, output_thread, resolve_thread_id, str_field};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ThreadCommands {
    #[command(about = "List all threads")]
    List,

    #[command(about = "Create a thread and make it current")]
    Create {
        #[arg(help = "Thread title (defaults to 'Untitled Thread')")]
        title: Option<String>,
    },

    #[command(about = "Show a thread with its tweets (defaults to current thread)")]
    Show {
        #[arg(help = "Thread ID")]
        id: Option<String>,
    },

    #[command(about = "Rename a thread (titles are capped at 20 characters)")]
    Rename {
        #[arg(help = "New title")]
        title: String,
        #[arg(long, help = "Thread ID (defaults to current thread)")]
        thread: Option<String>,
    },

    #[command(about = "Delete a thread")]
    Delete {
        #[arg(help = "Thread ID to delete")]
        id: String,
    },

    #[command(about = "Switch the current thread")]
    Use {
        #[arg(help = "Thread ID to switch to")]
        id: String,
    },

    #[command(about = "Show the current thread")]
    Current,
}

pub async fn handle(cmd: ThreadCommands, client: &ServerClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ThreadCommands::List => {
            let data = client.get("/api/threads").await?;
            let threads = data.get("threads").and_then(Value::as_array).cloned().unwrap_or_default();
            if threads.is_empty() {
                return output_empty_collection(&output_format, "threads", "No threads yet");
            }

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
                OutputFormat::Text => {
                    let current = data.get("currentThreadId").and_then(Value::as_str);
                    for thread in &threads {
                        let id = str_field(thread, "id");
                        let marker = if Some(id) == current { "*" } else { " " };
                        let count = thread.get("tweetCount").and_then(Value::as_u64).unwrap_or(0);
                        println!("{} {}  {:<20}  {} tweets", marker, id, str_field(thread, "title"), count);
                    }
                }
            }
            Ok(())
        }
        ThreadCommands::Create { title } => {
            let thread = client.post("/api/threads", &json!({ "title": title })).await?;
            output_success(
                &output_format,
                &format!("Created thread '{}' ({})", str_field(&thread, "title"), str_field(&thread, "id")),
                Some(json!({ "thread": thread })),
            )
        }
        ThreadCommands::Show { id } => {
            let thread = match id {
                Some(id) => client.get(&format!("/api/threads/{}", id)).await?,
                None => client.get("/api/threads/current").await?,
            };
            output_thread(&output_format, &thread)
        }
        ThreadCommands::Rename { title, thread } => {
            let thread_id = resolve_thread_id(client, thread).await?;
            let thread = client
                .patch(&format!("/api/threads/{}", thread_id), &json!({ "title": title }))
                .await?;
            output_success(
                &output_format,
                &format!("Renamed thread to '{}'", str_field(&thread, "title")),
                Some(json!({ "thread": thread })),
            )
        }
        ThreadCommands::Delete { id } => {
            client.delete(&format!("/api/threads/{}", id)).await?;
            output_success(&output_format, &format!("Thread '{}' deleted successfully", id), None)
        }
        ThreadCommands::Use { id } => {
            let thread = client.put("/api/threads/current", &json!({ "threadId": id })).await?;
            output_success(
                &output_format,
                &format!("Switched to thread '{}'", str_field(&thread, "title")),
                Some(json!({ "current_thread": str_field(&thread, "id") })),
            )
        }
        ThreadCommands::Current => {
            let thread = client.get("/api/threads/current").await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "current_thread": thread }))?),
                OutputFormat::Text => println!("Current thread: {} ({})", str_field(&thread, "title"), str_field(&thread, "id")),
            }
            Ok(())
        }
    }
}
