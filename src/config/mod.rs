use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub twitter: TwitterConfig,
    pub openai: OpenAiConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Largest single attachment kept in the thread store
    pub max_media_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    pub api_key: Option<String>,
    #[serde(skip_serializing)]
    pub api_secret: Option<String>,
    pub access_token: Option<String>,
    #[serde(skip_serializing)]
    pub access_secret: Option<String>,
    pub api_base: String,
    pub upload_base: String,
    pub chunk_size_bytes: usize,
    pub max_status_polls: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

const DEFAULT_TWITTER_API_BASE: &str = "https://api.twitter.com";
const DEFAULT_TWITTER_UPLOAD_BASE: &str = "https://upload.twitter.com";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const MEDIA_CHUNK_SIZE: usize = 5 * 1024 * 1024;

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Some(port) = env::var("THREADCRAFT_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("THREADCRAFT_BIND_HOST") {
            self.server.bind_host = v;
        }

        // Storage overrides
        if let Ok(v) = env::var("THREADCRAFT_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("STORAGE_MAX_MEDIA_BYTES") {
            self.storage.max_media_bytes = v.parse().unwrap_or(self.storage.max_media_bytes);
        }

        // Twitter credentials and endpoints
        self.twitter.api_key = non_empty_var("TWITTER_API_KEY").or(self.twitter.api_key);
        self.twitter.api_secret = non_empty_var("TWITTER_API_SECRET").or(self.twitter.api_secret);
        self.twitter.access_token = non_empty_var("TWITTER_ACCESS_TOKEN").or(self.twitter.access_token);
        self.twitter.access_secret = non_empty_var("TWITTER_ACCESS_SECRET").or(self.twitter.access_secret);
        if let Ok(v) = env::var("TWITTER_API_BASE") {
            self.twitter.api_base = v;
        }
        if let Ok(v) = env::var("TWITTER_UPLOAD_BASE") {
            self.twitter.upload_base = v;
        }
        if let Ok(v) = env::var("TWITTER_CHUNK_SIZE_BYTES") {
            self.twitter.chunk_size_bytes = v.parse().unwrap_or(self.twitter.chunk_size_bytes);
        }
        if let Ok(v) = env::var("TWITTER_MAX_STATUS_POLLS") {
            self.twitter.max_status_polls = v.parse().unwrap_or(self.twitter.max_status_polls);
        }

        // OpenAI overrides
        self.openai.api_key = non_empty_var("OPENAI_API_KEY").or(self.openai.api_key);
        if let Ok(v) = env::var("OPENAI_BASE_URL") {
            self.openai.base_url = v;
        }
        if let Ok(v) = env::var("OPENAI_MODEL") {
            self.openai.model = v;
        }
        if let Ok(v) = env::var("OPENAI_TEMPERATURE") {
            self.openai.temperature = v.parse().unwrap_or(self.openai.temperature);
        }
        if let Ok(v) = env::var("OPENAI_MAX_TOKENS") {
            self.openai.max_tokens = v.parse().unwrap_or(self.openai.max_tokens);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind_host: "0.0.0.0".to_string(),
                port: 3000,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from(".threadcraft"),
                max_media_bytes: 15 * 1024 * 1024, // 15MB
            },
            twitter: TwitterConfig::defaults(),
            openai: OpenAiConfig::defaults(),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 64 * 1024 * 1024, // 64MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind_host: "0.0.0.0".to_string(),
                port: 8080,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("/var/lib/threadcraft"),
                max_media_bytes: 15 * 1024 * 1024,
            },
            twitter: TwitterConfig::defaults(),
            openai: OpenAiConfig::defaults(),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 32 * 1024 * 1024, // 32MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind_host: "0.0.0.0".to_string(),
                port: 8080,
            },
            storage: StorageConfig {
                data_dir: PathBuf::from("/var/lib/threadcraft"),
                max_media_bytes: 15 * 1024 * 1024,
            },
            twitter: TwitterConfig::defaults(),
            openai: OpenAiConfig::defaults(),
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 32 * 1024 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.bind_host, self.server.port)
    }
}

impl TwitterConfig {
    fn defaults() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            access_token: None,
            access_secret: None,
            api_base: DEFAULT_TWITTER_API_BASE.to_string(),
            upload_base: DEFAULT_TWITTER_UPLOAD_BASE.to_string(),
            chunk_size_bytes: MEDIA_CHUNK_SIZE,
            max_status_polls: 30,
            request_timeout_secs: 60,
        }
    }
}

impl OpenAiConfig {
    fn defaults() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            request_timeout_secs: 30,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.twitter.chunk_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert!(config.twitter.api_key.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.openai.max_tokens, 500);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_secrets_are_not_serialized() {
        let mut config = AppConfig::development();
        config.twitter.api_secret = Some("consumer-secret".to_string());
        config.openai.api_key = Some("sk-test".to_string());

        let rendered = serde_json::to_string(&config).unwrap();
        assert!(!rendered.contains("consumer-secret"));
        assert!(!rendered.contains("sk-test"));
    }
}
