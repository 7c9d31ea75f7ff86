//! Data profiling module for dataset analysis.
//!
//! This module provides functionality for profiling parsed tables:
//! - Per-column missing/unique statistics
//! - Type inference for columns

mod statistics;
mod type_inference;

use crate::config::InferenceStrategy;
use crate::types::{ColumnStat, ColumnType, TabularResult};

pub use statistics::compute_stats;
pub use type_inference::{infer_type, infer_type_with};

/// Data profiler for analyzing table structure.
pub struct DataProfiler;

impl DataProfiler {
    /// Compute statistics for every column of `table`, ignoring any stats it already carries.
    pub fn compute_stats(table: &TabularResult) -> Vec<ColumnStat> {
        compute_stats(&table.rows, &table.columns)
    }

    /// Infer the type of every column, in column order.
    pub fn infer_types(
        table: &TabularResult,
        strategy: InferenceStrategy,
    ) -> Vec<(String, ColumnType)> {
        table
            .columns
            .iter()
            .map(|column| {
                (
                    column.clone(),
                    infer_type_with(column, &table.rows, strategy),
                )
            })
            .collect()
    }
}
