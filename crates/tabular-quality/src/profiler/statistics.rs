//! Per-column missing and unique value counts.

use crate::types::{ColumnStat, Row};
use std::collections::HashSet;

/// Compute one [`ColumnStat`] per column, in `columns` order.
///
/// A value is missing when it is absent from the row, null, or blank once
/// stringified. Every other value contributes its string form to the
/// column's uniqueness set. Total over any input.
pub fn compute_stats(rows: &[Row], columns: &[String]) -> Vec<ColumnStat> {
    columns
        .iter()
        .map(|column| column_stat(rows, column))
        .collect()
}

fn column_stat(rows: &[Row], column: &str) -> ColumnStat {
    let mut missing_count = 0;
    let mut uniques: HashSet<String> = HashSet::new();

    for row in rows {
        match row.get(column) {
            Some(value) if !value.is_missing() => {
                uniques.insert(value.display_string());
            }
            _ => missing_count += 1,
        }
    }

    ColumnStat {
        column: column.to_string(),
        missing_count,
        unique_count: uniques.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use pretty_assertions::assert_eq;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_compute_stats_name_age_scenario() {
        let rows = vec![
            row(&[("Name", "John".into()), ("Age", 25.0.into())]),
            row(&[("Name", "".into()), ("Age", 130.0.into())]),
            row(&[("Name", "Bob".into()), ("Age", 30.0.into())]),
        ];

        let stats = compute_stats(&rows, &columns(&["Name", "Age"]));

        assert_eq!(
            stats,
            vec![
                ColumnStat {
                    column: "Name".to_string(),
                    missing_count: 1,
                    unique_count: 2
                },
                ColumnStat {
                    column: "Age".to_string(),
                    missing_count: 0,
                    unique_count: 3
                },
            ]
        );
    }

    #[test]
    fn test_absent_keys_count_as_missing() {
        let rows = vec![row(&[("a", "x".into())]), row(&[])];
        let stats = compute_stats(&rows, &columns(&["a", "b"]));

        assert_eq!(stats[0].missing_count, 1);
        assert_eq!(stats[1].missing_count, 2);
        assert_eq!(stats[1].unique_count, 0);
    }

    #[test]
    fn test_whitespace_and_null_are_missing() {
        let rows = vec![
            row(&[("a", "  ".into())]),
            row(&[("a", CellValue::Null)]),
            row(&[("a", "v".into())]),
        ];
        let stats = compute_stats(&rows, &columns(&["a"]));
        assert_eq!(stats[0].missing_count, 2);
        assert_eq!(stats[0].unique_count, 1);
    }

    #[test]
    fn test_uniqueness_uses_string_form() {
        // 25 (number) and "25" (text) stringify identically
        let rows = vec![
            row(&[("a", 25.0.into())]),
            row(&[("a", "25".into())]),
            row(&[("a", "25 ".into())]),
        ];
        let stats = compute_stats(&rows, &columns(&["a"]));
        assert_eq!(stats[0].unique_count, 2);
    }

    #[test]
    fn test_compute_stats_is_idempotent() {
        let rows = vec![
            row(&[("a", "1".into()), ("b", CellValue::Null)]),
            row(&[("a", "2".into()), ("b", "y".into())]),
        ];
        let cols = columns(&["a", "b"]);
        assert_eq!(compute_stats(&rows, &cols), compute_stats(&rows, &cols));
    }

    #[test]
    fn test_counts_are_bounded_by_rows() {
        let rows = vec![
            row(&[("a", "1".into())]),
            row(&[("a", "".into()), ("b", "2".into())]),
            row(&[]),
        ];
        let cols = columns(&["a", "b", "c"]);
        let stats = compute_stats(&rows, &cols);

        let total_missing: usize = stats.iter().map(|s| s.missing_count).sum();
        assert!(total_missing <= rows.len() * cols.len());
        for stat in &stats {
            assert!(stat.unique_count <= rows.len() - stat.missing_count);
        }
    }

    #[test]
    fn test_empty_inputs() {
        assert!(compute_stats(&[], &[]).is_empty());
        let stats = compute_stats(&[], &columns(&["a"]));
        assert_eq!(stats[0].missing_count, 0);
        assert_eq!(stats[0].unique_count, 0);
    }
}
