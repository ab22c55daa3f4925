//! AI collaborator configuration
//!
//! The API key is read from the environment only and never logged.

use std::env;
use std::time::Duration;

/// Model used for both text and vision requests unless overridden
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Public Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Sampling temperature for advice requests
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Resolved settings for the Gemini client
#[derive(Clone)]
pub struct AiConfig {
    /// `GEMINI_API_KEY`; requests fail without it
    pub api_key: Option<String>,
    /// `GEMINI_MODEL`
    pub model: String,
    /// `GEMINI_BASE_URL`
    pub base_url: String,
    /// `GEMINI_TIMEOUT_SECS`
    pub timeout: Duration,
    /// Temperature for advice requests
    pub temperature: f32,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AiConfig {
    /// Reads the settings from environment variables, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_empty("GEMINI_API_KEY"),
            model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
            base_url: non_empty("GEMINI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout: non_empty("GEMINI_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map_or(defaults.timeout, Duration::from_secs),
            temperature: defaults.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AiConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AiConfig {
            api_key: Some("secret-key".to_string()),
            ..AiConfig::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
