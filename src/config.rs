use std::env;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("GOOGLE_API_KEY environment variable not set")]
    MissingApiKey,
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub temperature: f32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GOOGLE_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let model = lookup("GEMINI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_url = lookup("GEMINI_API_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let temperature = lookup("GEMINI_TEMPERATURE")
            .and_then(|t| t.trim().parse().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        Ok(Self {
            api_key,
            model,
            api_url,
            temperature,
        })
    }
}
