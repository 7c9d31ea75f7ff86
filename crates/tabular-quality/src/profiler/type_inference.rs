//! Type inference logic for column analysis.

use crate::config::InferenceStrategy;
use crate::types::{CellValue, ColumnType, Row};

/// Infer a column's type from its first non-missing value.
///
/// Returns [`ColumnType::Unknown`] when no row has a usable value.
pub fn infer_type(column: &str, rows: &[Row]) -> ColumnType {
    rows.iter()
        .filter_map(|row| row.get(column))
        .find(|value| !value.is_missing())
        .map(classify_value)
        .unwrap_or(ColumnType::Unknown)
}

/// Infer a column's type with the given strategy.
pub fn infer_type_with(column: &str, rows: &[Row], strategy: InferenceStrategy) -> ColumnType {
    match strategy {
        InferenceStrategy::FirstSample => infer_type(column, rows),
        InferenceStrategy::MajorityVote => infer_type_by_vote(column, rows),
    }
}

fn infer_type_by_vote(column: &str, rows: &[Row]) -> ColumnType {
    let (mut integer, mut email, mut text) = (0usize, 0usize, 0usize);

    for value in rows
        .iter()
        .filter_map(|row| row.get(column))
        .filter(|value| !value.is_missing())
    {
        match classify_value(value) {
            ColumnType::Integer => integer += 1,
            ColumnType::Email => email += 1,
            _ => text += 1,
        }
    }

    if integer + email + text == 0 {
        return ColumnType::Unknown;
    }

    // Ties resolve in declaration order
    [
        (ColumnType::Integer, integer),
        (ColumnType::Email, email),
        (ColumnType::Text, text),
    ]
    .into_iter()
    .fold((ColumnType::Unknown, 0), |best, (ty, votes)| {
        if votes > best.1 { (ty, votes) } else { best }
    })
    .0
}

/// Classify a single non-missing value.
pub(crate) fn classify_value(value: &CellValue) -> ColumnType {
    if value.finite_number().is_some() {
        ColumnType::Integer
    } else if matches!(value, CellValue::Text(s) if s.contains('@')) {
        ColumnType::Email
    } else {
        ColumnType::Text
    }
}
