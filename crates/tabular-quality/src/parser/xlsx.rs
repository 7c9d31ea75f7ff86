//! XLSX reader backed by `calamine`.
//!
//! Only the first worksheet is read. Its first used row is the header, and
//! every data row carries every header key, with empty cells as null.

use super::FormatError;
use crate::types::{CellValue, Row};
use crate::utils::{format_number, unique_name};
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use std::io::Cursor;
use tracing::debug;

/// Header name given to empty header cells.
const EMPTY_HEADER: &str = "__EMPTY";

/// Parse an XLSX workbook into columns and rows.
pub fn parse_xlsx(content: &[u8]) -> Result<(Vec<String>, Vec<Row>), FormatError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(content))
        .map_err(|e| FormatError(format!("cannot open workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FormatError("workbook has no worksheets".to_string()))?
        .map_err(|e| FormatError(format!("cannot read first worksheet: {}", e)))?;

    let mut sheet_rows = range.rows();
    let Some(header) = sheet_rows.next() else {
        debug!("First worksheet is empty");
        return Ok((Vec::new(), Vec::new()));
    };

    let columns = header_columns(header);
    let rows = sheet_rows
        .filter(|cells| !cells.iter().all(|c| matches!(c, Data::Empty)))
        .map(|cells| to_row(&columns, cells))
        .collect();

    Ok((columns, rows))
}

fn header_columns(header: &[Data]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(header.len());
    for cell in header {
        let base = match cell {
            Data::Empty => EMPTY_HEADER.to_string(),
            other => cell_text(other),
        };
        let name = unique_name(&base, &columns);
        columns.push(name);
    }
    columns
}

fn to_row(columns: &[String], cells: &[Data]) -> Row {
    columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let value = cells.get(idx).map(cell_value).unwrap_or(CellValue::Null);
            (column.clone(), value)
        })
        .collect()
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        // dates stay as their serial number
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => format_number(*f),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}
