pub mod client;
pub mod prompt;

pub use client::SuggestionClient;
pub use prompt::PRESET_PROMPTS;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Rewrite suggestion errors
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("OpenAI API key is not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("OpenAI API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("No response from OpenAI")]
    EmptyResponse,

    #[error("Unparseable completion: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub text: String,
    pub prompt: String,
    #[serde(default)]
    pub thread_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub score: f64,
}

/// Reads suggestions out of the completion text.
///
/// The model is asked for an array but JSON mode forces an object, so both
/// `{"suggestions": [...]}` and a bare array are accepted. Anything else
/// yields no suggestions.
pub fn parse_suggestions(content: &str) -> Result<Vec<Suggestion>, SuggestError> {
    let value: Value = serde_json::from_str(content)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("suggestions") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    Ok(items.into_iter().filter_map(suggestion_from_value).collect())
}

fn suggestion_from_value(value: Value) -> Option<Suggestion> {
    let text = value.get("text")?.as_str()?.trim().to_string();
    if text.is_empty() {
        return None;
    }
    let score = value.get("score").and_then(Value::as_f64).unwrap_or(0.0).clamp(0.0, 1.0);
    Some(Suggestion { text, score })
}
