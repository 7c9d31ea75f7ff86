//! CSV reader.
//!
//! The first record is the header. When it yields no usable column names the
//! reader switches to headerless mode and synthesizes `column_1..column_k`
//! from the first record's width. Every value is kept as text.

use crate::types::{CellValue, Row};
use crate::utils::{is_blank, unique_name};
use ::csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

/// Parse CSV text into columns and rows. Never fails.
pub fn parse_csv(text: &str, delimiter: u8) -> (Vec<String>, Vec<Row>) {
    let records = read_records(text, delimiter);

    let Some(header) = records.first() else {
        debug!("CSV input has no records");
        return (Vec::new(), Vec::new());
    };

    if header.iter().all(is_blank) {
        warn!(
            "CSV header yielded no columns, parsing {} records without header",
            records.len()
        );
        let columns: Vec<String> = (1..=header.len())
            .map(|i| format!("column_{}", i))
            .collect();
        let rows = records.iter().map(|r| to_row(&columns, r)).collect();
        return (columns, rows);
    }

    let columns = header_columns(header);
    let rows = records[1..].iter().map(|r| to_row(&columns, r)).collect();
    (columns, rows)
}

/// Read every record, skipping the ones the reader rejects.
fn read_records(text: &str, delimiter: u8) -> Vec<StringRecord> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .filter_map(|result| match result {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed CSV record: {}", e);
                None
            }
        })
        .collect()
}

/// Trimmed, non-empty, unique column names from the header record.
fn header_columns(header: &StringRecord) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(header.len());
    for (idx, raw) in header.iter().enumerate() {
        let trimmed = raw.trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.to_string()
        };
        let name = unique_name(&base, &columns);
        columns.push(name);
    }
    columns
}

/// Map positional fields onto column names. Extra fields are dropped.
fn to_row(columns: &[String], record: &StringRecord) -> Row {
    columns
        .iter()
        .zip(record.iter())
        .map(|(column, field)| (column.clone(), CellValue::text(field)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_names_are_trimmed() {
        let (columns, rows) = parse_csv(" Name , Age\nJohn,25\nBob,30\n", b',');
        assert_eq!(columns, names(&["Name", "Age"]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], CellValue::text("John"));
        assert_eq!(rows[1]["Age"], CellValue::text("30"));
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let (_, rows) = parse_csv("a,b\n1,2\n\n3,4\n\n", b',');
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_quoted_fields() {
        let (columns, rows) = parse_csv("name,note\n\"Doe, Jane\",\"said \"\"hi\"\"\"\n", b',');
        assert_eq!(columns, names(&["name", "note"]));
        assert_eq!(rows[0]["name"], CellValue::text("Doe, Jane"));
        assert_eq!(rows[0]["note"], CellValue::text("said \"hi\""));
    }

    #[test]
    fn test_ragged_rows() {
        let (columns, rows) = parse_csv("a,b,c\n1\n1,2,3,4\n", b',');
        assert_eq!(columns.len(), 3);

        assert_eq!(rows[0].len(), 1);
        assert!(rows[0].get("b").is_none());

        // extra field dropped
        assert_eq!(rows[1].len(), 3);
        assert!(rows[1].keys().all(|k| columns.contains(k)));
    }

    #[test]
    fn test_blank_header_falls_back_to_headerless() {
        let (columns, rows) = parse_csv(",,\n1,2,3\n4,5,6\n", b',');
        assert_eq!(columns, names(&["column_1", "column_2", "column_3"]));
        // the blank header line is itself a data line
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["column_2"], CellValue::text("2"));
    }

    #[test]
    fn test_partially_blank_header_gets_positional_name() {
        let (columns, _) = parse_csv("id,,score\n1,x,9\n", b',');
        assert_eq!(columns, names(&["id", "column_2", "score"]));
    }

    #[test]
    fn test_duplicate_headers_are_disambiguated() {
        let (columns, rows) = parse_csv("id,id,id\n1,2,3\n", b',');
        assert_eq!(columns, names(&["id", "id_1", "id_2"]));
        assert_eq!(rows[0]["id_2"], CellValue::text("3"));
    }

    #[test]
    fn test_empty_input() {
        let (columns, rows) = parse_csv("", b',');
        assert!(columns.is_empty());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_header_only() {
        let (columns, rows) = parse_csv("a,b\n", b',');
        assert_eq!(columns, names(&["a", "b"]));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_values_stay_text() {
        let (_, rows) = parse_csv("n\n42\n", b',');
        assert_eq!(rows[0]["n"], CellValue::text("42"));
    }
}
