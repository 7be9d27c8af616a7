use clap::Args;
use serde_json::{json, Value};

use crate::cli::client::ServerClient;
use crate::cli::utils::str_field;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct SuggestArgs {
    #[arg(help = "Tweet text to rewrite", required_unless_present = "list_prompts")]
    pub text: Option<String>,

    #[arg(long, default_value = "Make it more engaging", help = "Rewrite instruction")]
    pub prompt: String,

    #[arg(long, help = "Use this stored thread as context")]
    pub thread: Option<String>,

    #[arg(long, help = "List the preset prompts and exit")]
    pub list_prompts: bool,
}

pub async fn handle(args: SuggestArgs, client: &ServerClient, output_format: OutputFormat) -> anyhow::Result<()> {
    if args.list_prompts {
        let data = client.get("/api/suggestions/prompts").await?;
        match output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
            OutputFormat::Text => {
                for prompt in data.get("prompts").and_then(Value::as_array).into_iter().flatten() {
                    println!("- {}", prompt.as_str().unwrap_or_default());
                }
            }
        }
        return Ok(());
    }

    let text = args.text.unwrap_or_default();
    let data = match args.thread {
        Some(thread_id) => {
            client
                .post(
                    &format!("/api/threads/{}/suggestions", thread_id),
                    &json!({ "text": text, "prompt": args.prompt }),
                )
                .await?
        }
        None => {
            client
                .post("/api/suggestions", &json!({ "text": text, "prompt": args.prompt }))
                .await?
        }
    };

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Text => {
            let suggestions = data.get("suggestions").and_then(Value::as_array).cloned().unwrap_or_default();
            if suggestions.is_empty() {
                println!("No suggestions returned");
            }
            for suggestion in &suggestions {
                let score = suggestion.get("score").and_then(Value::as_f64).unwrap_or(0.0);
                println!("[{:.2}] {}", score, str_field(suggestion, "text"));
            }
        }
    }
    Ok(())
}
