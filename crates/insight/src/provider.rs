//! Chat-completion provider abstraction and HTTP implementation.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::InsightConfig;
use crate::error::InsightError;

/// A provider of chat completions.
///
/// The analyzer only needs the assistant's final text; everything else
/// (auth, transport, model selection) lives behind this trait so tests can
/// substitute a canned or failing provider.
#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    /// Run one completion over the given messages and return the response
    /// text.
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, InsightError>;
}

/// HTTP chat-completion provider.
///
/// Posts OpenAI-shaped requests to `{api_url}/v1/chat/completions`. The
/// request timeout is set on the client: a slow provider surfaces as a
/// network error within `timeout_secs` rather than stalling the caller. No
/// retries are attempted; the caller's fallback path handles failures.
pub struct HttpProvider {
    client: Client,
    config: InsightConfig,
}

impl HttpProvider {
    /// Create a provider from the given configuration.
    pub fn new(config: InsightConfig) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                InsightError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Create a provider from environment variables.
    ///
    /// See [`InsightConfig::from_env`] for the variables involved.
    pub fn from_env() -> Result<Self, InsightError> {
        Self::new(InsightConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &InsightConfig {
        &self.config
    }
}

#[async_trait]
impl ChatCompletionProvider for HttpProvider {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, InsightError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %request.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as a structured API error
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(InsightError::Provider(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(InsightError::Provider(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Parse(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| InsightError::Parse("No content in response".to_string()))
    }
}
