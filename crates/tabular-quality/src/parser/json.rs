//! JSON reader.
//!
//! A top-level array yields one row per element; any other value, `null`
//! included, is wrapped as the sole row. Columns are the keys of the first row.

use super::FormatError;
use crate::types::{CellValue, Row};
use serde_json::Value;

/// Parse JSON text into columns and rows.
pub fn parse_json(text: &str) -> Result<(Vec<String>, Vec<Row>), FormatError> {
    let value: Value = serde_json::from_str(text).map_err(|e| FormatError(e.to_string()))?;

    let elements = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let columns: Vec<String> = match elements.first() {
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => Vec::new(),
    };

    let rows = elements
        .into_iter()
        .map(|element| to_row(&columns, element))
        .collect();

    Ok((columns, rows))
}

/// Keep only the keys that are known columns.
fn to_row(columns: &[String], element: Value) -> Row {
    let Value::Object(map) = element else {
        return Row::new();
    };

    map.into_iter()
        .filter(|(key, _)| columns.contains(key))
        .map(|(key, value)| (key, CellValue::from(value)))
        .collect()
}
