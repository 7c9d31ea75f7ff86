use crate::ai::InsightOutcome;
use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt};
use crate::pipeline::Analysis;
use crate::profiler::compute_stats;
use crate::types::{CellValue, ColumnIssues, ColumnStat, QualityGrade, QualityMetrics, TabularResult};
use crate::utils::truncate_chars;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Complete report of one analysis, for JSON output and the text summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    pub file_name: String,
    pub rows_count: usize,
    pub cols_count: usize,
    pub stats: Vec<ColumnStat>,
    pub metrics: QualityMetrics,
    pub grade: QualityGrade,
    pub column_issues: Vec<ColumnIssues>,
    pub preview_summary: PreviewSummary,
    pub insights: Vec<String>,
    /// Why no insights are present, if they were requested and failed
    pub insight_error: Option<String>,
}

/// Headline counts shown next to the data preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    pub columns_identified: usize,
    pub total_missing: usize,
    pub columns_with_missing: usize,
    /// Columns in which every value is missing
    pub columns_without_values: usize,
}

impl PreviewSummary {
    pub fn from_stats(columns: usize, stats: &[ColumnStat]) -> Self {
        Self {
            columns_identified: columns,
            total_missing: stats.iter().map(|s| s.missing_count).sum(),
            columns_with_missing: stats.iter().filter(|s| s.missing_count > 0).count(),
            columns_without_values: stats.iter().filter(|s| s.unique_count == 0).count(),
        }
    }
}

/// Leading rows of a table as display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPreview {
    pub columns: Vec<String>,
    /// One entry per column; missing and null cells are empty strings
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl DataPreview {
    pub fn from_table(table: &TabularResult, max_rows: usize, max_chars: usize) -> Self {
        let rows = table
            .rows
            .iter()
            .take(max_rows)
            .map(|row| {
                table
                    .columns
                    .iter()
                    .map(|column| match row.get(column) {
                        None | Some(CellValue::Null) => String::new(),
                        Some(value) => truncate_chars(&value.display_string(), max_chars),
                    })
                    .collect()
            })
            .collect();

        Self {
            columns: table.columns.clone(),
            rows,
            total_rows: table.rows.len(),
        }
    }

    /// Whether rows were left out of the preview.
    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total_rows
    }
}

// ============================================================================
// Report Generator
// ============================================================================

pub struct ReportGenerator;

impl ReportGenerator {
    /// Build a report from an analysis and the outcome of its insight request.
    ///
    /// Stats that do not match the table's columns are recomputed.
    pub fn build_report(analysis: &Analysis, insights: &InsightOutcome) -> AnalysisReport {
        let table = &analysis.table;
        let stats = if table.stats_cover_columns() {
            table.stats.clone()
        } else {
            compute_stats(&table.rows, &table.columns)
        };

        AnalysisReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            file_name: analysis.file_name.clone(),
            rows_count: table.row_count(),
            cols_count: table.column_count(),
            preview_summary: PreviewSummary::from_stats(table.column_count(), &stats),
            stats,
            metrics: analysis.metrics.clone(),
            grade: analysis.metrics.grade(),
            column_issues: analysis.column_issues.clone(),
            insights: insights.insights.clone(),
            insight_error: insights.error.clone(),
        }
    }

    /// Preview of an analysis using the configured limits.
    pub fn build_preview(analysis: &Analysis, config: &AnalysisConfig) -> DataPreview {
        DataPreview::from_table(
            &analysis.table,
            config.preview_rows,
            config.preview_value_chars,
        )
    }

    /// Write a report as pretty JSON.
    pub fn write_report_to_file(report: &AnalysisReport, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        fs::write(path, json).context(format!("Writing report {}", path.display()))?;
        info!("Report saved: {}", path.display());
        Ok(())
    }
}

impl AnalysisReport {
    /// Human-readable summary.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let m = &self.metrics;

        // writeln! into a String cannot fail
        let _ = writeln!(out, "Data quality report: {}", self.file_name);
        let _ = writeln!(out, "Generated: {}", self.generated_at);
        let _ = writeln!(out, "Rows: {}  Columns: {}", self.rows_count, self.cols_count);
        let _ = writeln!(out);
        let _ = writeln!(out, "Score: {} ({})", m.score, self.grade);
        let _ = writeln!(out, "  Completeness: {}%", m.completeness);
        let _ = writeln!(out, "  Consistency:  {}%", m.consistency);
        let _ = writeln!(out, "  Accuracy:     {}%", m.accuracy);
        let _ = writeln!(
            out,
            "  Missing values: {}  Outliers: {}",
            m.total_missing, m.outlier_count
        );

        let s = &self.preview_summary;
        let _ = writeln!(out);
        let _ = writeln!(out, "Columns identified: {}", s.columns_identified);
        let _ = writeln!(
            out,
            "Null values found: {} total across {} columns",
            s.total_missing, s.columns_with_missing
        );
        let _ = writeln!(
            out,
            "Potential issues: {} columns with no unique values",
            s.columns_without_values
        );

        if !self.column_issues.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Columns:");
            for issue in &self.column_issues {
                let _ = write!(
                    out,
                    "  {} ({}): {} unique, {} missing",
                    issue.column, issue.inferred_type, issue.unique_count, issue.missing_count
                );
                if issue.has_outliers {
                    let _ = write!(out, ", {} outliers", issue.outlier_count);
                }
                if issue.duplicate_count > 0 {
                    let _ = write!(out, ", {} duplicated values", issue.duplicate_count);
                }
                let _ = writeln!(out, " - {} issues", issue.total_issues());
            }
        }

        if !self.insights.is_empty() || self.insight_error.is_some() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Insights:");
            for insight in &self.insights {
                let _ = writeln!(out, "  \u{2022} {}", insight);
            }
            if let Some(reason) = &self.insight_error {
                let _ = writeln!(out, "  (no insights: {})", reason);
            }
        }

        out
    }
}
