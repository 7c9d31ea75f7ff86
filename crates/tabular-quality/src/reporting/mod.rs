//! Report generation module.
//!
//! This module provides the presentation view models built from an
//! analysis: the full report, a data preview and its headline summary.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabular_quality::reporting::ReportGenerator;
//!
//! let outcome = analyzer.insights(&analysis).await;
//! let report = ReportGenerator::build_report(&analysis, &outcome);
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or as text
//! print!("{}", report.render_text());
//! ```

mod generator;

pub use generator::{AnalysisReport, DataPreview, PreviewSummary, ReportGenerator};
