//! Configuration for the interest analyzer.

use std::env;

use crate::error::InsightError;

/// Configuration for the chat-completion provider.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// Provider base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Temperature for generation.
    pub temperature: Option<f32>,

    /// Maximum tokens for the analysis response.
    pub max_tokens: Option<u32>,

    /// Request timeout in seconds. A slow provider must never stall the
    /// caller indefinitely; on timeout the keyword fallback kicks in exactly
    /// as on any other failure.
    pub timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            temperature: Some(0.3),
            max_tokens: Some(1024),
            timeout_secs: 12,
        }
    }
}

impl InsightConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `INSIGHT_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `INSIGHT_API_URL` - Provider base URL (default: https://api.openai.com)
    /// - `INSIGHT_MODEL` - Model name (default: gpt-4o-mini)
    /// - `INSIGHT_TEMPERATURE` - Temperature (default: 0.3)
    /// - `INSIGHT_MAX_TOKENS` - Max tokens (default: 1024)
    /// - `INSIGHT_TIMEOUT_SECS` - Request timeout in seconds (default: 12)
    pub fn from_env() -> Result<Self, InsightError> {
        let api_key = env::var("INSIGHT_API_KEY")
            .map_err(|_| InsightError::Configuration("INSIGHT_API_KEY not set".to_string()))?;

        let defaults = Self::default();

        let api_url = env::var("INSIGHT_API_URL").unwrap_or(defaults.api_url);
        let model = env::var("INSIGHT_MODEL").unwrap_or(defaults.model);

        let temperature = env::var("INSIGHT_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.temperature);

        let max_tokens = env::var("INSIGHT_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(defaults.max_tokens);

        let timeout_secs = env::var("INSIGHT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Ok(Self {
            api_url,
            api_key,
            model,
            temperature,
            max_tokens,
            timeout_secs,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> InsightConfigBuilder {
        InsightConfigBuilder::default()
    }
}

/// Builder for InsightConfig.
#[derive(Debug, Default)]
pub struct InsightConfigBuilder {
    config: InsightConfig,
}

impl InsightConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the provider base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> InsightConfig {
        self.config
    }
}
