use serde_json::Value;

use crate::cli::client::ServerClient;
use crate::cli::utils::str_field;
use crate::cli::OutputFormat;

pub async fn handle(client: &ServerClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let data = client.get("/health").await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Text => {
            let flag = |key: &str| match data.get(key).and_then(Value::as_bool) {
                Some(true) => "configured",
                _ => "not configured",
            };
            println!("Server: {}", client.url(""));
            println!("Status: {}", str_field(&data, "status"));
            println!("Storage: {}", str_field(&data, "storage"));
            println!("Threads: {}", data.get("threads").and_then(Value::as_u64).unwrap_or(0));
            println!("Twitter: {}", flag("twitter"));
            println!("OpenAI: {}", flag("openai"));
        }
    }
    Ok(())
}
