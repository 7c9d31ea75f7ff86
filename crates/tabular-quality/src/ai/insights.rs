//! Insight facade: request, normalize and soften failures.

use super::{InsightProvider, InsightRequest};
use crate::error::InsightError;
use crate::types::{QualityMetrics, TabularResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Line breaks and bullet characters separate individual insights.
static INSIGHT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\r\u{2022}-]").expect("Invalid regex pattern"));

/// Result of a non-fatal insight request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightOutcome {
    pub insights: Vec<String>,
    /// Human-readable reason when the request failed.
    pub error: Option<String>,
}

impl InsightOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            insights: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Split free text into trimmed, non-empty insight lines.
///
/// Hyphens split too, so hyphenated words break apart.
pub fn split_insight_text(text: &str) -> Vec<String> {
    INSIGHT_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ask `provider` for insights about `table`. One call, no retry.
pub async fn generate_insights(
    provider: &dyn InsightProvider,
    table: &TabularResult,
    metrics: &QualityMetrics,
    sample_rows: usize,
) -> Result<Vec<String>, InsightError> {
    let request = InsightRequest::new(table, metrics, sample_rows);
    debug!(
        "Requesting insights from {} (model: {}) with {} sample rows",
        provider.name(),
        provider.model().unwrap_or("n/a"),
        request.sample_rows.len()
    );

    let insights: Vec<String> = provider
        .generate(&request)
        .await?
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    info!("{} returned {} insights", provider.name(), insights.len());
    Ok(insights)
}

/// Like [`generate_insights`] but never fails: errors become a reason string.
pub async fn generate_insights_lenient(
    provider: &dyn InsightProvider,
    table: &TabularResult,
    metrics: &QualityMetrics,
    sample_rows: usize,
) -> InsightOutcome {
    match generate_insights(provider, table, metrics, sample_rows).await {
        Ok(insights) => InsightOutcome {
            insights,
            error: None,
        },
        Err(e) => {
            warn!("Insight generation via {} failed: {}", provider.name(), e);
            InsightOutcome::failed(e.reason())
        }
    }
}
