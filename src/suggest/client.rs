use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::prompt::{system_prompt, user_prompt};
use super::{parse_suggestions, SuggestError, Suggestion, SuggestionRequest};
use crate::config::OpenAiConfig;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat-completion client producing tweet rewrite suggestions
#[derive(Debug, Clone)]
pub struct SuggestionClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl SuggestionClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self, SuggestError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        if config.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; suggestions are disabled");
        }

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn suggest(&self, request: &SuggestionRequest) -> Result<Vec<Suggestion>, SuggestError> {
        let api_key = self.api_key.as_deref().ok_or(SuggestError::MissingApiKey)?;

        let body = ChatCompletionRequest {
            model: &self.model,
            response_format: ResponseFormat { kind: "json_object" },
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Some(system_prompt(&request.prompt)),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: Some(user_prompt(&request.text, &request.thread_context)),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, prompt = %request.prompt, "Requesting suggestions");
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.pointer("/error/message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or(text);
            error!(status = status.as_u16(), message = %message, "OpenAI API error");
            return Err(SuggestError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(SuggestError::EmptyResponse)?;

        let suggestions = parse_suggestions(&content)?;
        info!(count = suggestions.len(), "Suggestions generated");
        Ok(suggestions)
    }
}
