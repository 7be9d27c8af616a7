pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::ServerClient;

#[derive(Parser)]
#[command(name = "threadcraft-cli")]
#[command(about = "Threadcraft CLI - compose and publish threads against a threadcraft server")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "THREADCRAFT_URL",
        default_value = "http://localhost:3000",
        help = "Server base URL"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create, list and select threads")]
    Thread {
        #[command(subcommand)]
        cmd: commands::thread::ThreadCommands,
    },

    #[command(about = "Edit the tweets of a thread")]
    Tweet {
        #[command(subcommand)]
        cmd: commands::tweet::TweetCommands,
    },

    #[command(about = "Upload media and post a stored thread to Twitter")]
    Publish(commands::publish::PublishArgs),

    #[command(about = "Ask for AI rewrites of a tweet")]
    Suggest(commands::suggest::SuggestArgs),

    #[command(about = "Check server health status from the /health endpoint")]
    Health,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ServerClient::new(&cli.server)?;

    match cli.command {
        Commands::Thread { cmd } => commands::thread::handle(cmd, &client, output_format).await,
        Commands::Tweet { cmd } => commands::tweet::handle(cmd, &client, output_format).await,
        Commands::Publish(args) => commands::publish::handle(args, &client, output_format).await,
        Commands::Suggest(args) => commands::suggest::handle(args, &client, output_format).await,
        Commands::Health => commands::health::handle(&client, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_subcommands_with_global_flags() {
        let cli = Cli::try_parse_from([
            "threadcraft-cli",
            "--server",
            "http://example.test:4000",
            "tweet",
            "add",
            "hello",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.server, "http://example.test:4000");
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Tweet { .. }));
    }

    #[test]
    fn text_is_the_default_output() {
        let cli = Cli::try_parse_from(["threadcraft-cli", "health"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Text));
    }
}
