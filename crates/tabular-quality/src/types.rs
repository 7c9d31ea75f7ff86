//! Core data model: parsed tables, per-column statistics and quality metrics.
//!
//! All view models serialize with camelCase field names, which is the shape
//! consumed by the insight service and by presentation layers.

use crate::utils::{coerce_numeric_str, format_number, is_blank};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Cell Values
// ============================================================================

/// A single scalar cell of a parsed table.
///
/// A key that is absent from a [`Row`] is "missing" in the same sense as
/// [`CellValue::Null`]; the two differ only in whether the key is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// JSON arrays and objects, kept as-is.
    Nested(serde_json::Value),
}

/// The primitive kind of a non-null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Object,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::String => write!(f, "string"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Object => write!(f, "object"),
        }
    }
}

impl CellValue {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Primitive kind of this value, `None` for [`CellValue::Null`].
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            CellValue::Null => None,
            CellValue::Bool(_) => Some(ValueKind::Boolean),
            CellValue::Number(_) => Some(ValueKind::Number),
            CellValue::Text(_) => Some(ValueKind::String),
            CellValue::Nested(_) => Some(ValueKind::Object),
        }
    }

    /// Whether the value counts as missing: null, or blank once stringified.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => is_blank(s),
            CellValue::Bool(_) | CellValue::Number(_) => false,
            CellValue::Nested(_) => is_blank(&self.display_string()),
        }
    }

    /// String form of the value, as used for uniqueness and display.
    ///
    /// Arrays join their elements with `,` and objects render as
    /// `[object Object]`, so two different objects stringify identically.
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Null => "null".to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Nested(v) => stringify_json(v),
        }
    }

    /// Loose numeric conversion; `None` where the conversion is not a number.
    pub fn coerce_number(&self) -> Option<f64> {
        match self {
            CellValue::Null => Some(0.0),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => coerce_numeric_str(s),
            CellValue::Nested(serde_json::Value::Array(_)) => {
                coerce_numeric_str(&self.display_string())
            }
            CellValue::Nested(_) => None,
        }
    }

    /// Like [`CellValue::coerce_number`] but only finite results.
    pub fn finite_number(&self) -> Option<f64> {
        self.coerce_number().filter(|n| n.is_finite())
    }
}

fn stringify_json(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.as_f64().map(format_number).unwrap_or_default(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(stringify_json)
            .collect::<Vec<_>>()
            .join(","),
        serde_json::Value::Object(_) => "[object Object]".to_string(),
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Null,
            serde_json::Value::Bool(b) => CellValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Null),
            serde_json::Value::String(s) => CellValue::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                CellValue::Nested(nested)
            }
        }
    }
}

impl From<CellValue> for serde_json::Value {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Null => serde_json::Value::Null,
            CellValue::Bool(b) => serde_json::Value::Bool(b),
            CellValue::Number(n) => {
                // keep integral values integral on the wire
                if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
                    serde_json::json!(n as i64)
                } else {
                    serde_json::Number::from_f64(n)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null)
                }
            }
            CellValue::Text(s) => serde_json::Value::String(s),
            CellValue::Nested(v) => v,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// One record of a table, keyed by column name in insertion order.
pub type Row = IndexMap<String, CellValue>;

// ============================================================================
// Parsed Table
// ============================================================================

/// The canonical parsed-file representation.
///
/// Every row's keys are a subset of `columns`. Rows may leave columns
/// unpopulated (ragged CSV) and `rows` may be empty while `columns` is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    #[serde(default)]
    pub stats: Vec<ColumnStat>,
}

impl TabularResult {
    /// An empty table with no columns, rows or stats.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Value of `column` in row `row`, `None` if the row or key is absent.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Whether the row/column cell is missing (absent, null or blank).
    pub fn is_missing(&self, row: usize, column: &str) -> bool {
        self.value(row, column).is_none_or(CellValue::is_missing)
    }

    /// Whether `stats` holds exactly one entry per column, in column order.
    pub fn stats_cover_columns(&self) -> bool {
        self.stats.len() == self.columns.len()
            && self
                .stats
                .iter()
                .zip(&self.columns)
                .all(|(stat, column)| &stat.column == column)
    }

    /// Stat entry for `column`, if stats have been computed.
    pub fn stat(&self, column: &str) -> Option<&ColumnStat> {
        self.stats.iter().find(|s| s.column == column)
    }
}

/// Per-column missing and unique value counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStat {
    pub column: String,
    pub missing_count: usize,
    pub unique_count: usize,
}

// ============================================================================
// Inferred Column Types
// ============================================================================

/// Apparent type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Email,
    Text,
    /// No non-missing value to sample.
    Unknown,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "Integer"),
            ColumnType::Email => write!(f, "Email"),
            ColumnType::Text => write!(f, "Text"),
            ColumnType::Unknown => write!(f, "Unknown"),
        }
    }
}

// ============================================================================
// Quality Metrics
// ============================================================================

/// Composite data quality metrics for one analysis run.
///
/// Percentages are integers. `accuracy` is floored at 50.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub rows_count: usize,
    pub cols_count: usize,
    pub completeness: u32,
    pub consistency: u32,
    pub accuracy: u32,
    pub score: u32,
    pub outlier_count: usize,
    pub total_missing: usize,
}

impl QualityMetrics {
    pub fn grade(&self) -> QualityGrade {
        QualityGrade::from_score(self.score)
    }
}

/// Human-readable band for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityGrade {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 90 => QualityGrade::Excellent,
            s if s >= 75 => QualityGrade::Good,
            s if s >= 50 => QualityGrade::Fair,
            _ => QualityGrade::Poor,
        }
    }
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityGrade::Excellent => write!(f, "Excellent"),
            QualityGrade::Good => write!(f, "Good"),
            QualityGrade::Fair => write!(f, "Fair"),
            QualityGrade::Poor => write!(f, "Poor"),
        }
    }
}

/// Per-column issue flags used by presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnIssues {
    pub column: String,
    pub inferred_type: ColumnType,
    pub missing_count: usize,
    pub unique_count: usize,
    pub has_missing: bool,
    /// Values `> 120` or `< 0`; only counted for `Integer` columns.
    pub outlier_count: usize,
    pub has_outliers: bool,
    /// Distinct values occurring more than once; only counted for `Text` columns.
    pub duplicate_count: usize,
}

impl ColumnIssues {
    pub fn total_issues(&self) -> usize {
        self.missing_count + self.outlier_count + self.duplicate_count
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_kind() {
        assert_eq!(CellValue::Null.kind(), None);
        assert_eq!(CellValue::Bool(true).kind(), Some(ValueKind::Boolean));
        assert_eq!(CellValue::Number(1.0).kind(), Some(ValueKind::Number));
        assert_eq!(CellValue::text("a").kind(), Some(ValueKind::String));
        assert_eq!(CellValue::Nested(json!([1])).kind(), Some(ValueKind::Object));
    }

    #[test]
    fn test_is_missing() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::text("").is_missing());
        assert!(CellValue::text("   ").is_missing());
        assert!(CellValue::Nested(json!([])).is_missing());
        assert!(!CellValue::Number(0.0).is_missing());
        assert!(!CellValue::Bool(false).is_missing());
        assert!(!CellValue::text("0").is_missing());
        assert!(!CellValue::Nested(json!({})).is_missing());
    }

    #[test]
    fn test_display_string() {
        assert_eq!(CellValue::Number(25.0).display_string(), "25");
        assert_eq!(CellValue::Number(2.5).display_string(), "2.5");
        assert_eq!(CellValue::Bool(true).display_string(), "true");
        assert_eq!(CellValue::Nested(json!([1, "a", null])).display_string(), "1,a,");
        assert_eq!(
            CellValue::Nested(json!({"k": 1})).display_string(),
            "[object Object]"
        );
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(CellValue::text("130").coerce_number(), Some(130.0));
        assert_eq!(CellValue::Bool(true).coerce_number(), Some(1.0));
        assert_eq!(CellValue::text("Bob").coerce_number(), None);
        assert_eq!(CellValue::Nested(json!([7])).coerce_number(), Some(7.0));
        assert_eq!(CellValue::Nested(json!({"a": 1})).coerce_number(), None);
        assert_eq!(CellValue::text("Infinity").finite_number(), None);
    }

    #[test]
    fn test_coerce_number_loose_forms() {
        assert_eq!(CellValue::Null.coerce_number(), Some(0.0));
        assert_eq!(CellValue::text("  ").coerce_number(), Some(0.0));
        assert_eq!(CellValue::text("0x10").coerce_number(), Some(16.0));
        assert_eq!(CellValue::text("0b101").coerce_number(), Some(5.0));
        assert_eq!(CellValue::text("-Infinity").coerce_number(), Some(f64::NEG_INFINITY));
        assert_eq!(CellValue::Nested(json!([])).coerce_number(), Some(0.0));
        assert_eq!(CellValue::Nested(json!([1, 2])).coerce_number(), None);
    }

    #[test]
    fn test_cell_value_json_conversion() {
        assert_eq!(CellValue::from(json!(25)), CellValue::Number(25.0));
        assert_eq!(CellValue::from(json!(null)), CellValue::Null);
        assert_eq!(CellValue::from(json!("x")), CellValue::text("x"));

        let json = serde_json::to_string(&CellValue::Number(25.0)).unwrap();
        assert_eq!(json, "25");
        let json = serde_json::to_string(&CellValue::Number(2.5)).unwrap();
        assert_eq!(json, "2.5");
    }

    #[test]
    fn test_row_serializes_in_insertion_order() {
        let mut row = Row::new();
        row.insert("Name".to_string(), CellValue::text("John"));
        row.insert("Age".to_string(), CellValue::Number(25.0));
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Name":"John","Age":25}"#);
    }

    #[test]
    fn test_tabular_result_missing_lookup() {
        let mut row = Row::new();
        row.insert("a".to_string(), CellValue::text("x"));
        let table = TabularResult {
            columns: vec!["a".to_string(), "b".to_string()],
            rows: vec![row],
            stats: vec![],
        };
        assert!(!table.is_missing(0, "a"));
        assert!(table.is_missing(0, "b"));
        assert!(!table.stats_cover_columns());
        assert!(table.is_missing(5, "a"));
    }

    #[test]
    fn test_quality_grade_bands() {
        assert_eq!(QualityGrade::from_score(100), QualityGrade::Excellent);
        assert_eq!(QualityGrade::from_score(90), QualityGrade::Excellent);
        assert_eq!(QualityGrade::from_score(85), QualityGrade::Good);
        assert_eq!(QualityGrade::from_score(50), QualityGrade::Fair);
        assert_eq!(QualityGrade::from_score(49), QualityGrade::Poor);
    }

    #[test]
    fn test_metrics_serialize_camel_case() {
        let metrics = QualityMetrics {
            rows_count: 3,
            cols_count: 2,
            completeness: 83,
            consistency: 100,
            accuracy: 95,
            score: 91,
            outlier_count: 1,
            total_missing: 1,
        };
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains("\"rowsCount\":3"));
        assert!(json.contains("\"outlierCount\":1"));
    }
}
