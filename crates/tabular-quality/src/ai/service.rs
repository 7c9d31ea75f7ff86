//! HTTP insight service provider.
//!
//! Posts the [`InsightRequest`] as JSON to a configured endpoint and expects
//! `{"insights": [...]}` back. A failed response may explain itself with a
//! `reason` or `error` field.

use super::{InsightProvider, InsightRequest};
use crate::error::InsightError;
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable selecting the service endpoint.
pub const SERVICE_URL_ENV: &str = "INSIGHT_SERVICE_URL";

const DEFAULT_FAILURE_REASON: &str = "Insight service request failed";

#[derive(Debug, Deserialize)]
struct ServiceResponse {
    #[serde(default)]
    insights: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceFailure {
    reason: Option<String>,
    error: Option<String>,
}

/// Configuration for the insight service provider.
#[derive(Debug, Clone)]
pub struct InsightServiceConfig {
    /// Endpoint receiving the POSTed request.
    pub url: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl InsightServiceConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: None,
        }
    }

    /// Set a request timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}

/// Provider backed by a remote insight service.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_quality::ai::{InsightServiceConfig, InsightServiceProvider};
///
/// let provider = InsightServiceProvider::new(
///     InsightServiceConfig::new("http://localhost:3000/api/insights").with_timeout_secs(30),
/// )?;
/// ```
pub struct InsightServiceProvider {
    config: InsightServiceConfig,
    client: Client,
}

impl InsightServiceProvider {
    pub fn new(config: InsightServiceConfig) -> Result<Self, InsightError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Endpoint this provider posts to.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    async fn request_insights(&self, request: &InsightRequest) -> Result<Vec<String>, InsightError> {
        let response = self
            .client
            .post(&self.config.url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let reason = failure_reason(&text);
            warn!("Insight service error {}: {}", status, reason);
            return Err(InsightError::Status {
                status: status.as_u16(),
                reason,
            });
        }

        let parsed: ServiceResponse = serde_json::from_str(&text)
            .map_err(|e| InsightError::MalformedResponse(e.to_string()))?;
        debug!("Insight service returned {} insights", parsed.insights.len());
        Ok(parsed.insights)
    }
}

impl InsightProvider for InsightServiceProvider {
    fn generate<'a>(
        &'a self,
        request: &'a InsightRequest,
    ) -> BoxFuture<'a, Result<Vec<String>, InsightError>> {
        self.request_insights(request).boxed()
    }

    fn name(&self) -> &str {
        "InsightService"
    }
}

fn failure_reason(body: &str) -> String {
    serde_json::from_str::<ServiceFailure>(body)
        .ok()
        .and_then(|f| f.reason.or(f.error))
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string())
}
