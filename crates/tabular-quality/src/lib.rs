//! Tabular Data Quality Library
//!
//! Profiles uploaded tabular files and scores their data quality, with
//! optional AI-generated insights.
//!
//! # Overview
//!
//! This library provides:
//!
//! - **Parsing**: CSV, JSON and XLSX into one canonical table; anything else
//!   (or anything malformed) degrades to a single `content` column
//! - **Profiling**: Per-column missing and unique counts, apparent column types
//! - **Quality Scoring**: Completeness, consistency and accuracy folded into one score
//! - **Insights**: Optional short recommendations from an external AI service
//! - **Sessions**: The latest analysis can be saved and restored
//! - **Reporting**: JSON and text reports plus a bounded data preview
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tabular_quality::{Analyzer, ReportGenerator};
//! use tabular_quality::ai::OpenAiProvider;
//! use std::sync::Arc;
//!
//! let analyzer = Analyzer::builder()
//!     .insight_provider(Arc::new(OpenAiProvider::from_env()?))
//!     .build()?;
//!
//! let analysis = analyzer.analyze_path("people.csv").await?;
//! println!("Score: {} ({})", analysis.metrics.score, analysis.metrics.grade());
//!
//! let outcome = analyzer.insights(&analysis).await;
//! let report = ReportGenerator::build_report(&analysis, &outcome);
//! print!("{}", report.render_text());
//! ```
//!
//! # Insight Providers
//!
//! Insights come from any [`ai::InsightProvider`]. Implemented providers:
//!
//! - [`ai::OpenAiProvider`] - OpenAI chat completions
//! - [`ai::InsightServiceProvider`] - a generic JSON endpoint
//!
//! A failing provider never fails the analysis; the outcome carries zero
//! insights and the reason instead.
//!
//! # Configuration
//!
//! ```rust,ignore
//! use tabular_quality::config::{AnalysisConfig, InferenceStrategy};
//!
//! let config = AnalysisConfig::builder()
//!     .type_inference(InferenceStrategy::MajorityVote)
//!     .insight_sample_rows(10)
//!     .build()?;
//! ```

pub mod ai;
pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use ai::{InsightOutcome, InsightProvider, InsightRequest};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, InferenceStrategy};
pub use error::{AnalysisError, InsightError, Result as AnalysisResult, ResultExt};
pub use parser::{FileFormat, ParseOptions};
pub use pipeline::{Analysis, Analyzer, AnalyzerBuilder};
pub use profiler::DataProfiler;
pub use quality::QualityScorer;
pub use reporting::{AnalysisReport, DataPreview, PreviewSummary, ReportGenerator};
pub use session::{AnalysisSnapshot, FileSessionStore, InMemorySessionStore, SessionStore};
pub use types::{
    CellValue, ColumnIssues, ColumnStat, ColumnType, QualityGrade, QualityMetrics, Row,
    TabularResult,
};
