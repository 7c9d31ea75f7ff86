//! Insight provider trait for abstracting the external insight generator.
//!
//! This module defines the [`InsightProvider`] trait so the analysis core can
//! request natural-language findings without knowing which service produces
//! them. Tests inject a fake provider; the CLI wires in a real one.
//!
//! # Implementing a New Provider
//!
//! 1. Create a new file in `src/ai/` (e.g., `ollama.rs`)
//! 2. Implement the [`InsightProvider`] trait for your provider struct
//! 3. Export the provider in `src/ai/mod.rs`
//!
//! # Example
//!
//! ```rust,ignore
//! use tabular_quality::ai::{InsightProvider, InsightRequest};
//! use tabular_quality::error::InsightError;
//! use futures::future::{BoxFuture, FutureExt};
//!
//! struct Canned;
//!
//! impl InsightProvider for Canned {
//!     fn generate<'a>(
//!         &'a self,
//!         _request: &'a InsightRequest,
//!     ) -> BoxFuture<'a, Result<Vec<String>, InsightError>> {
//!         async { Ok(vec!["Fill in missing names".to_string()]) }.boxed()
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Canned"
//!     }
//! }
//! ```

use crate::error::InsightError;
use crate::profiler::compute_stats;
use crate::types::{ColumnStat, QualityMetrics, Row, TabularResult};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Payload sent to an insight generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub stats: Vec<ColumnStat>,
    pub metrics: QualityMetrics,
    pub sample_rows: Vec<Row>,
}

impl InsightRequest {
    /// Build a request from a table, its metrics and the leading `sample_rows` rows.
    pub fn new(table: &TabularResult, metrics: &QualityMetrics, sample_rows: usize) -> Self {
        let stats = if table.stats_cover_columns() {
            table.stats.clone()
        } else {
            compute_stats(&table.rows, &table.columns)
        };

        Self {
            stats,
            metrics: metrics.clone(),
            sample_rows: table.rows.iter().take(sample_rows).cloned().collect(),
        }
    }
}

/// Trait for services that turn an analysis into insight strings.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so they can be shared as
/// `Arc<dyn InsightProvider>` across tasks.
///
/// # Error Handling
///
/// Every failure is an [`InsightError`]. Callers treat it as non-fatal and
/// show zero insights with [`InsightError::reason`].
pub trait InsightProvider: Send + Sync {
    /// Request insights for one analysis. A single call, never retried.
    fn generate<'a>(
        &'a self,
        request: &'a InsightRequest,
    ) -> BoxFuture<'a, Result<Vec<String>, InsightError>>;

    /// Get the provider name for logging and debugging.
    fn name(&self) -> &str;

    /// Get the model being used by this provider.
    ///
    /// Returns `None` if the provider doesn't expose model information.
    fn model(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;

    fn metrics() -> QualityMetrics {
        QualityMetrics {
            rows_count: 7,
            cols_count: 1,
            completeness: 100,
            consistency: 100,
            accuracy: 100,
            score: 100,
            outlier_count: 0,
            total_missing: 0,
        }
    }

    fn table(rows: usize) -> TabularResult {
        let rows: Vec<Row> = (0..rows)
            .map(|i| {
                let mut row = Row::new();
                row.insert("id".to_string(), CellValue::Number(i as f64));
                row
            })
            .collect();
        TabularResult {
            columns: vec!["id".to_string()],
            rows,
            stats: vec![],
        }
    }

    #[test]
    fn test_request_takes_leading_rows() {
        let request = InsightRequest::new(&table(7), &metrics(), 5);
        assert_eq!(request.sample_rows.len(), 5);
        assert_eq!(request.sample_rows[0]["id"], CellValue::Number(0.0));
        // stats computed when the table carries none
        assert_eq!(request.stats.len(), 1);
        assert_eq!(request.stats[0].unique_count, 7);
    }

    #[test]
    fn test_request_with_few_rows() {
        let request = InsightRequest::new(&table(2), &metrics(), 5);
        assert_eq!(request.sample_rows.len(), 2);
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = InsightRequest::new(&table(1), &metrics(), 5);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("sampleRows").is_some());
        assert_eq!(json["stats"][0]["missingCount"], 0);
        assert_eq!(json["metrics"]["rowsCount"], 7);
    }
}
