use std::sync::Arc;

use anyhow::Context;

use crate::config::AppConfig;
use crate::store::{StateFile, ThreadStore};
use crate::suggest::SuggestionClient;
use crate::twitter::TwitterClient;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ThreadStore,
    pub twitter: Arc<TwitterClient>,
    pub suggestions: Arc<SuggestionClient>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store = ThreadStore::open(StateFile::in_dir(&config.storage.data_dir), config.storage.max_media_bytes)
            .await
            .with_context(|| format!("failed to open thread storage in {}", config.storage.data_dir.display()))?;
        let twitter = TwitterClient::new(&config.twitter).context("failed to build Twitter client")?;
        let suggestions = SuggestionClient::new(&config.openai).context("failed to build OpenAI client")?;

        Ok(Self {
            config: Arc::new(config),
            store,
            twitter: Arc::new(twitter),
            suggestions: Arc::new(suggestions),
        })
    }
}
