//! Pipeline module.
//!
//! This module provides the analyzer that drives one file through parsing,
//! scoring, insight generation and session persistence.

mod builder;

pub use builder::{Analysis, Analyzer, AnalyzerBuilder, NO_PROVIDER_MESSAGE};
