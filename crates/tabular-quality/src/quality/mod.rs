//! Data quality scoring module.
//!
//! This module turns a parsed table into composite quality metrics
//! (completeness, consistency, accuracy and a weighted score) and into
//! per-column issue flags: missing values, outliers and duplicates.

mod analyzer;

pub use analyzer::QualityScorer;
