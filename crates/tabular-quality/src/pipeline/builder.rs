//! Main analysis pipeline module.
//!
//! This module provides the [`Analyzer`] struct and builder for running the
//! parse, statistics, scoring and insight stages over one uploaded file.

use crate::ai::{InsightOutcome, InsightProvider, generate_insights_lenient};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result, ResultExt};
use crate::parser::{self, ParseOptions};
use crate::profiler::compute_stats;
use crate::quality::QualityScorer;
use crate::session::{AnalysisSnapshot, SessionStore};
use crate::types::{ColumnIssues, QualityMetrics, TabularResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Message reported when insights are requested without a provider.
pub const NO_PROVIDER_MESSAGE: &str = "no insight provider configured";

/// Everything derived from one uploaded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub file_name: String,
    pub table: TabularResult,
    pub metrics: QualityMetrics,
    pub column_issues: Vec<ColumnIssues>,
}

/// The analysis pipeline.
///
/// Use [`Analyzer::builder()`] to create an analyzer with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_quality::{Analyzer, AnalysisConfig, InMemorySessionStore};
/// use tabular_quality::ai::OpenAiProvider;
/// use std::sync::Arc;
///
/// let analyzer = Analyzer::builder()
///     .insight_provider(Arc::new(OpenAiProvider::from_env()?))
///     .session_store(Arc::new(InMemorySessionStore::new()))
///     .config(AnalysisConfig::default())
///     .build()?;
///
/// let analysis = analyzer.analyze_path("people.csv").await?;
/// let outcome = analyzer.insights(&analysis).await;
/// analyzer.remember(&analysis)?;
/// ```
pub struct Analyzer {
    config: AnalysisConfig,
    parse_options: ParseOptions,
    insight_provider: Option<Arc<dyn InsightProvider>>,
    session_store: Option<Arc<dyn SessionStore>>,
}

// Analyses run inside spawned tasks
static_assertions::assert_impl_all!(Analyzer: Send, Sync);

impl Analyzer {
    /// Create a new analyzer builder.
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Whether insight requests can reach a provider.
    pub fn has_insight_provider(&self) -> bool {
        self.insight_provider.is_some()
    }

    /// Parse and score raw file content. Never fails.
    pub fn analyze_bytes(&self, file_name: &str, content: &[u8]) -> Analysis {
        let start = Instant::now();
        let table = parser::parse_with_config(file_name, content, &self.parse_options);
        let analysis = self.analyze_table(file_name, table);

        info!(
            "Analyzed '{}': {} rows x {} columns, score {} ({}) in {:.2?}",
            file_name,
            analysis.metrics.rows_count,
            analysis.metrics.cols_count,
            analysis.metrics.score,
            analysis.metrics.grade(),
            start.elapsed()
        );
        analysis
    }

    /// Score an already parsed table.
    ///
    /// Stats that are absent or do not match the columns are recomputed, so
    /// the returned table always carries current stats.
    pub fn analyze_table(&self, file_name: &str, mut table: TabularResult) -> Analysis {
        if !table.stats_cover_columns() {
            debug!("Recomputing stats for '{}'", file_name);
            table.stats = compute_stats(&table.rows, &table.columns);
        }

        let metrics = QualityScorer::compute_quality(&table);
        let column_issues = QualityScorer::column_issues(&table, self.config.type_inference);
        debug!(
            "{} of {} columns have issues",
            column_issues.iter().filter(|c| c.has_issues()).count(),
            column_issues.len()
        );

        Analysis {
            file_name: file_name.to_string(),
            table,
            metrics,
            column_issues,
        }
    }

    /// Read a file and analyze it.
    ///
    /// # Errors
    ///
    /// Only reading the file can fail; parsing degrades instead.
    pub async fn analyze_path(&self, path: impl AsRef<Path>) -> Result<Analysis> {
        let path = path.as_ref();
        let content = tokio::fs::read(path)
            .await
            .context(format!("Reading {}", path.display()))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(self.analyze_bytes(&file_name, &content))
    }

    /// Request insights for an analysis. Never fails.
    ///
    /// Returns zero insights and no error when insight generation is disabled.
    pub async fn insights(&self, analysis: &Analysis) -> InsightOutcome {
        if !self.config.generate_insights {
            debug!("Insight generation disabled");
            return InsightOutcome::default();
        }

        let Some(provider) = &self.insight_provider else {
            return InsightOutcome::failed(NO_PROVIDER_MESSAGE);
        };

        generate_insights_lenient(
            provider.as_ref(),
            &analysis.table,
            &analysis.metrics,
            self.config.insight_sample_rows,
        )
        .await
    }

    /// Store the analysis as the latest snapshot. A no-op without a store.
    pub fn remember(&self, analysis: &Analysis) -> Result<()> {
        let Some(store) = &self.session_store else {
            debug!("No session store configured, not saving '{}'", analysis.file_name);
            return Ok(());
        };

        let snapshot = AnalysisSnapshot::new(
            analysis.file_name.clone(),
            analysis.table.clone(),
            analysis.metrics.clone(),
        );
        store.save(&snapshot).inspect_err(|e| {
            warn!("Failed to save analysis of '{}': {}", analysis.file_name, e);
        })
    }

    /// Recompute the analysis of the stored snapshot, if there is one.
    pub fn restore(&self) -> Result<Option<Analysis>> {
        let Some(store) = &self.session_store else {
            return Ok(None);
        };

        let Some(snapshot) = store.load()? else {
            debug!("Session store is empty");
            return Ok(None);
        };

        info!(
            "Restoring analysis of '{}' saved at {}",
            snapshot.file_name, snapshot.saved_at
        );
        Ok(Some(self.analyze_table(&snapshot.file_name, snapshot.table)))
    }

    /// Like [`Analyzer::restore`] but a missing snapshot is an error.
    pub fn restore_required(&self) -> Result<Analysis> {
        self.restore()?.ok_or(AnalysisError::NoAnalysis)
    }
}

/// Builder for creating an [`Analyzer`] instance.
///
/// Use [`Analyzer::builder()`] to get started.
#[derive(Default)]
pub struct AnalyzerBuilder {
    config: Option<AnalysisConfig>,
    parse_options: Option<ParseOptions>,
    insight_provider: Option<Arc<dyn InsightProvider>>,
    session_store: Option<Arc<dyn SessionStore>>,
}

static_assertions::assert_impl_all!(AnalyzerBuilder: Send);

impl AnalyzerBuilder {
    /// Set the analysis configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set parser options such as the CSV delimiter.
    pub fn parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = Some(options);
        self
    }

    /// Set the provider used by [`Analyzer::insights`].
    ///
    /// Use `Arc` so one provider can be shared by several analyzers.
    pub fn insight_provider(mut self, provider: Arc<dyn InsightProvider>) -> Self {
        self.insight_provider = Some(provider);
        self
    }

    /// Set the store used by [`Analyzer::remember`] and [`Analyzer::restore`].
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Build the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Analyzer> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Analyzer {
            config,
            parse_options: self.parse_options.unwrap_or_default(),
            insight_provider: self.insight_provider,
            session_store: self.session_store,
        })
    }
}
