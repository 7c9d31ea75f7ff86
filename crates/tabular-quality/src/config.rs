//! Configuration types for the analysis pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic analyzer setup.

use serde::{Deserialize, Serialize};

/// How a column's apparent type is inferred from its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InferenceStrategy {
    /// Classify by the first non-missing value only.
    #[default]
    FirstSample,
    /// Every non-missing value votes; ties favour Integer, then Email, then Text.
    MajorityVote,
}

/// Configuration for the analysis pipeline.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_quality::config::{AnalysisConfig, InferenceStrategy};
///
/// let config = AnalysisConfig::builder()
///     .type_inference(InferenceStrategy::MajorityVote)
///     .preview_rows(50)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Strategy used to infer column types for issue classification.
    /// Default: FirstSample
    pub type_inference: InferenceStrategy,

    /// Number of rows included in the data preview.
    /// Default: 100
    pub preview_rows: usize,

    /// Maximum characters of each value shown in the data preview.
    /// Default: 100
    pub preview_value_chars: usize,

    /// Number of leading rows sent to the insight service as a sample.
    /// Default: 5
    pub insight_sample_rows: usize,

    /// Whether to request insights when a provider is available.
    /// Default: true
    pub generate_insights: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            type_inference: InferenceStrategy::default(),
            preview_rows: 100,
            preview_value_chars: 100,
            insight_sample_rows: 5,
            generate_insights: true,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.preview_rows == 0 {
            return Err(ConfigValidationError::ZeroLimit("preview_rows".to_string()));
        }

        if self.preview_value_chars == 0 {
            return Err(ConfigValidationError::ZeroLimit(
                "preview_value_chars".to_string(),
            ));
        }

        if self.insight_sample_rows == 0 {
            return Err(ConfigValidationError::ZeroLimit(
                "insight_sample_rows".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid value for '{0}': must be at least 1")]
    ZeroLimit(String),
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    type_inference: Option<InferenceStrategy>,
    preview_rows: Option<usize>,
    preview_value_chars: Option<usize>,
    insight_sample_rows: Option<usize>,
    generate_insights: Option<bool>,
}

impl AnalysisConfigBuilder {
    /// Set the column type inference strategy.
    pub fn type_inference(mut self, strategy: InferenceStrategy) -> Self {
        self.type_inference = Some(strategy);
        self
    }

    /// Set how many rows the data preview shows.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set how many characters of each value the data preview shows.
    pub fn preview_value_chars(mut self, chars: usize) -> Self {
        self.preview_value_chars = Some(chars);
        self
    }

    /// Set how many sample rows are sent to the insight service.
    pub fn insight_sample_rows(mut self, rows: usize) -> Self {
        self.insight_sample_rows = Some(rows);
        self
    }

    /// Enable or disable insight generation.
    pub fn generate_insights(mut self, generate: bool) -> Self {
        self.generate_insights = Some(generate);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            type_inference: self.type_inference.unwrap_or_default(),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            preview_value_chars: self
                .preview_value_chars
                .unwrap_or(defaults.preview_value_chars),
            insight_sample_rows: self
                .insight_sample_rows
                .unwrap_or(defaults.insight_sample_rows),
            generate_insights: self.generate_insights.unwrap_or(defaults.generate_insights),
        };

        config.validate()?;
        Ok(config)
    }
}
