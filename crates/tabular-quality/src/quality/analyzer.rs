use crate::config::InferenceStrategy;
use crate::profiler::{compute_stats, infer_type_with};
use crate::types::{
    CellValue, ColumnIssues, ColumnStat, ColumnType, QualityMetrics, Row, TabularResult, ValueKind,
};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Outlier bounds for age-like values.
const MIN_PLAUSIBLE: f64 = 0.0;
const MAX_PLAUSIBLE: f64 = 120.0;

/// Penalty per outlier, and the accuracy floor.
const OUTLIER_PENALTY: u32 = 5;
const ACCURACY_FLOOR: u32 = 50;

const COMPLETENESS_WEIGHT: f64 = 0.45;
const CONSISTENCY_WEIGHT: f64 = 0.35;
const ACCURACY_WEIGHT: f64 = 0.20;

/// Column whose values are checked for accuracy outliers.
const ACCURACY_COLUMN: &str = "age";

pub struct QualityScorer;

impl QualityScorer {
    /// Compute the composite quality metrics of a table. Total: never fails.
    ///
    /// Uses the table's attached stats when they cover every column, and
    /// recomputes them otherwise.
    pub fn compute_quality(table: &TabularResult) -> QualityMetrics {
        let stats = Self::stats_for(table);
        let rows_count = table.rows.len();
        let cols_count = table.columns.len();

        let total_cells = (rows_count * cols_count).max(1);
        let total_missing: usize = stats.iter().map(|s| s.missing_count).sum();
        let completeness = percent(1.0 - total_missing as f64 / total_cells as f64);

        let type_issues = table
            .columns
            .iter()
            .filter(|column| Self::has_type_issue(&table.rows, column))
            .count();
        let consistency = percent(1.0 - type_issues as f64 / cols_count.max(1) as f64);

        let outlier_count = Self::accuracy_outliers(table);
        let penalty = u32::try_from(outlier_count)
            .unwrap_or(u32::MAX)
            .saturating_mul(OUTLIER_PENALTY);
        let accuracy = 100u32.saturating_sub(penalty).max(ACCURACY_FLOOR);

        let score = (COMPLETENESS_WEIGHT * completeness as f64
            + CONSISTENCY_WEIGHT * consistency as f64
            + ACCURACY_WEIGHT * accuracy as f64)
            .round()
            .clamp(0.0, 100.0) as u32;

        debug!(
            "Quality: completeness={} consistency={} accuracy={} score={} (type issues: {}, outliers: {})",
            completeness, consistency, accuracy, score, type_issues, outlier_count
        );

        QualityMetrics {
            rows_count,
            cols_count,
            completeness,
            consistency,
            accuracy,
            score,
            outlier_count,
            total_missing,
        }
    }

    /// Per-column issue flags for presentation.
    pub fn column_issues(table: &TabularResult, strategy: InferenceStrategy) -> Vec<ColumnIssues> {
        let stats = Self::stats_for(table);

        table
            .columns
            .iter()
            .zip(stats.iter())
            .map(|(column, stat)| {
                let inferred_type = infer_type_with(column, &table.rows, strategy);
                let outlier_count = match inferred_type {
                    ColumnType::Integer => count_outliers(&table.rows, column),
                    _ => 0,
                };
                let duplicate_count = match inferred_type {
                    ColumnType::Text => count_duplicates(&table.rows, column),
                    _ => 0,
                };

                ColumnIssues {
                    column: column.clone(),
                    inferred_type,
                    missing_count: stat.missing_count,
                    unique_count: stat.unique_count,
                    has_missing: stat.missing_count > 0,
                    outlier_count,
                    has_outliers: outlier_count > 0,
                    duplicate_count,
                }
            })
            .collect()
    }

    fn stats_for(table: &TabularResult) -> Cow<'_, [ColumnStat]> {
        if table.stats_cover_columns() {
            Cow::Borrowed(table.stats.as_slice())
        } else {
            Cow::Owned(compute_stats(&table.rows, &table.columns))
        }
    }

    /// Non-missing values of the column span more than one primitive kind.
    fn has_type_issue(rows: &[Row], column: &str) -> bool {
        let kinds: HashSet<ValueKind> = rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|value| !value.is_missing())
            .filter_map(CellValue::kind)
            .collect();
        kinds.len() > 1
    }

    fn accuracy_outliers(table: &TabularResult) -> usize {
        table
            .columns
            .iter()
            .find(|column| column.eq_ignore_ascii_case(ACCURACY_COLUMN))
            .map(|column| {
                table
                    .rows
                    .iter()
                    .filter_map(|row| row.get(column))
                    .filter_map(CellValue::coerce_number)
                    .filter(|&n| is_outlier(n))
                    .count()
            })
            .unwrap_or(0)
    }
}

fn is_outlier(value: f64) -> bool {
    !value.is_nan() && (value > MAX_PLAUSIBLE || value < MIN_PLAUSIBLE)
}

/// Round a ratio to an integer percentage in `[0, 100]`.
fn percent(ratio: f64) -> u32 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u32
}

fn count_outliers(rows: &[Row], column: &str) -> usize {
    rows.iter()
        .filter_map(|row| row.get(column))
        .filter(|value| !value.is_missing())
        .filter_map(CellValue::coerce_number)
        .filter(|&n| is_outlier(n))
        .count()
}

/// Number of distinct non-missing values that occur more than once.
fn count_duplicates(rows: &[Row], column: &str) -> usize {
    let mut occurrences: HashMap<String, usize> = HashMap::new();
    for value in rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|value| !value.is_missing())
    {
        *occurrences.entry(value.display_string()).or_insert(0) += 1;
    }
    occurrences.values().filter(|&&count| count > 1).count()
}
