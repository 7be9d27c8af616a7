use anyhow::Context;
use tracing_subscriber::EnvFilter;

use threadcraft::config::config;
use threadcraft::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up TWITTER_* and OPENAI_API_KEY
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("threadcraft=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting Threadcraft in {:?} mode", config.environment);

    let bind_addr = config.bind_addr();
    let state = AppState::new(config.clone()).await?;
    tracing::info!(
        data_dir = %config.storage.data_dir.display(),
        twitter = state.twitter.is_configured(),
        openai = state.suggestions.is_configured(),
        "Thread storage ready"
    );
    if threadcraft::is_production!() && !state.twitter.is_configured() {
        tracing::warn!("Running in production without Twitter credentials; publishing will answer 503");
    }

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Threadcraft listening on http://{}", bind_addr);

    axum::serve(listener, threadcraft::app(state)).await.context("server")?;
    Ok(())
}
