//! OpenAI chat-completions insight provider.
//!
//! This module provides the [`OpenAiProvider`] which implements the
//! [`InsightProvider`] trait by prompting a chat model as a data quality
//! analyst and splitting its free-text answer into individual insights.

use super::{InsightProvider, InsightRequest, split_insight_text};
use crate::error::InsightError;
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model to use for insights.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default temperature for model responses.
const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Default max tokens for responses.
const DEFAULT_MAX_TOKENS: u32 = 400;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const SYSTEM_PROMPT: &str = "You are a helpful data quality analyst.";

/// Reason reported when a failed response carries no message of its own.
const DEFAULT_FAILURE_REASON: &str = "OpenAI API request failed";

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// The chat model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Temperature for response generation (0.0 - 2.0).
    pub temperature: f32,
    /// Maximum tokens in the response.
    pub max_tokens: u32,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Endpoint URL (useful for proxies or compatible servers).
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Create a new configuration builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// Builder for [`OpenAiConfig`].
#[derive(Default)]
pub struct OpenAiConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
    base_url: Option<String>,
}

impl OpenAiConfigBuilder {
    /// Set the model to use.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature (0.0 - 2.0).
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set a request timeout in seconds.
    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    /// Set a custom endpoint URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiConfig {
        OpenAiConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            timeout_secs: self.timeout_secs,
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// OpenAI provider for generating data quality insights.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_quality::ai::{OpenAiConfig, OpenAiProvider};
///
/// // Key from OPENAI_API_KEY
/// let provider = OpenAiProvider::from_env()?;
///
/// // With custom configuration
/// let config = OpenAiConfig::builder()
///     .model("gpt-4o")
///     .timeout_secs(20)
///     .build();
/// let provider = OpenAiProvider::with_config("your-api-key", config)?;
/// ```
pub struct OpenAiProvider {
    api_key: Option<String>,
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiProvider {
    /// Create a new provider with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>) -> Result<Self, InsightError> {
        Self::with_config(api_key, OpenAiConfig::default())
    }

    /// Create a new provider with custom configuration.
    ///
    /// A blank key is accepted here and reported as
    /// [`InsightError::MissingApiKey`] on the first request.
    pub fn with_config(
        api_key: impl Into<String>,
        config: OpenAiConfig,
    ) -> Result<Self, InsightError> {
        let api_key = Some(api_key.into()).filter(|key| !key.trim().is_empty());
        Self::build(api_key, config)
    }

    /// Create a provider whose key comes from the `OPENAI_API_KEY` variable.
    pub fn from_env() -> Result<Self, InsightError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::build(api_key, OpenAiConfig::default())
    }

    fn build(api_key: Option<String>, config: OpenAiConfig) -> Result<Self, InsightError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            api_key,
            config,
            client,
        })
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn request_insights(&self, request: &InsightRequest) -> Result<Vec<String>, InsightError> {
        let api_key = self.api_key.as_deref().ok_or(InsightError::MissingApiKey)?;

        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: build_prompt(request)?,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let reason = failure_reason(&text);
            warn!("OpenAI API error {}: {}", status, reason);
            return Err(InsightError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        let content = extract_content(&text)?;
        debug!("OpenAI returned {} characters", content.len());
        Ok(split_insight_text(&content))
    }
}

impl InsightProvider for OpenAiProvider {
    fn generate<'a>(
        &'a self,
        request: &'a InsightRequest,
    ) -> BoxFuture<'a, Result<Vec<String>, InsightError>> {
        self.request_insights(request).boxed()
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model(&self) -> Option<&str> {
        Some(self.config.model.as_str())
    }
}

/// The user prompt embedding stats, metrics and sample rows as JSON.
fn build_prompt(request: &InsightRequest) -> Result<String, InsightError> {
    let encode = |value: serde_json::Result<String>| {
        value.map_err(|e| InsightError::MalformedResponse(format!("cannot encode request: {}", e)))
    };
    let stats = encode(serde_json::to_string(&request.stats))?;
    let metrics = encode(serde_json::to_string(&request.metrics))?;
    let sample = encode(serde_json::to_string(&request.sample_rows))?;

    Ok(format!(
        "You are a data quality analyst. Given the following column stats, metrics, and a \
        sample of the actual data, provide 3-5 actionable, specific insights for improving \
        data quality.\n\n\
        Column stats: {}\n\
        Metrics: {}\n\
        Sample data: {}\n\n\
        Be specific to the data, and avoid generic advice.",
        stats, metrics, sample
    ))
}

/// `error.message` of a failed response, or a generic reason.
fn failure_reason(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string())
}

/// Text of the first choice; an absent message yields empty text.
fn extract_content(body: &str) -> Result<String, InsightError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| InsightError::MalformedResponse(e.to_string()))?;

    Ok(response
        .choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default())
}
