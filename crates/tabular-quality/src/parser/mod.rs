//! File format detection and parsing into a [`TabularResult`].
//!
//! Parsing never fails. Malformed CSV degrades to headerless parsing, and any
//! other unrecoverable problem degrades to the opaque single-column fallback,
//! so every caller receives a well-formed table with statistics attached.

pub mod csv;
pub mod json;
pub mod xlsx;

use crate::profiler::compute_stats;
use crate::types::{CellValue, Row, TabularResult};
use crate::utils::truncate_chars;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the single column produced by the opaque fallback.
pub const FALLBACK_COLUMN: &str = "content";

/// Default number of characters kept by the opaque fallback.
pub const DEFAULT_FALLBACK_CHARS: usize = 200;

/// Supported input formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
    Xlsx,
    /// Anything else; captured as a single opaque value.
    Other,
}

impl FileFormat {
    /// Detect the format from a file name's extension, ignoring case.
    pub fn detect(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => FileFormat::Csv,
            Some("json") => FileFormat::Json,
            Some("xlsx") => FileFormat::Xlsx,
            _ => FileFormat::Other,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Json => write!(f, "json"),
            FileFormat::Xlsx => write!(f, "xlsx"),
            FileFormat::Other => write!(f, "other"),
        }
    }
}

/// Options controlling how raw content is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Field delimiter for CSV input.
    pub csv_delimiter: u8,
    /// Characters of raw text kept by the opaque fallback.
    pub fallback_chars: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            csv_delimiter: b',',
            fallback_chars: DEFAULT_FALLBACK_CHARS,
        }
    }
}

/// A format reader failed and the caller should fall back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError(pub String);

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse `content` according to the format implied by `file_name`.
///
/// # Example
///
/// ```rust,ignore
/// use tabular_quality::parser::parse;
///
/// let table = parse("notes.txt", b"hello world");
/// assert_eq!(table.columns, vec!["content"]);
/// ```
pub fn parse(file_name: &str, content: &[u8]) -> TabularResult {
    parse_with_config(file_name, content, &ParseOptions::default())
}

/// Parse with explicit [`ParseOptions`].
pub fn parse_with_config(file_name: &str, content: &[u8], options: &ParseOptions) -> TabularResult {
    let format = FileFormat::detect(file_name);
    debug!("Parsing '{}' as {} ({} bytes)", file_name, format, content.len());

    let parsed = match format {
        FileFormat::Csv => Ok(csv::parse_csv(&decode(content), options.csv_delimiter)),
        FileFormat::Json => json::parse_json(&decode(content)),
        FileFormat::Xlsx => xlsx::parse_xlsx(content),
        FileFormat::Other => Err(FormatError("unrecognized extension".to_string())),
    };

    let (columns, rows) = match parsed {
        Ok(table) => table,
        Err(e) => {
            if format != FileFormat::Other {
                warn!("Failed to parse '{}' as {}: {}", file_name, format, e);
            }
            fallback(&decode(content), options.fallback_chars)
        }
    };

    let stats = compute_stats(&rows, &columns);
    debug!(
        "Parsed '{}': {} columns, {} rows",
        file_name,
        columns.len(),
        rows.len()
    );

    TabularResult {
        columns,
        rows,
        stats,
    }
}

/// Decode bytes as UTF-8, replacing invalid sequences.
fn decode(content: &[u8]) -> String {
    String::from_utf8_lossy(content).into_owned()
}

/// Capture the whole text as one opaque value.
fn fallback(text: &str, max_chars: usize) -> (Vec<String>, Vec<Row>) {
    let mut row = Row::new();
    row.insert(
        FALLBACK_COLUMN.to_string(),
        CellValue::Text(truncate_chars(text, max_chars)),
    );
    (vec![FALLBACK_COLUMN.to_string()], vec![row])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_format_case_insensitive() {
        assert_eq!(FileFormat::detect("data.csv"), FileFormat::Csv);
        assert_eq!(FileFormat::detect("DATA.CSV"), FileFormat::Csv);
        assert_eq!(FileFormat::detect("records.Json"), FileFormat::Json);
        assert_eq!(FileFormat::detect("book.XLSX"), FileFormat::Xlsx);
        assert_eq!(FileFormat::detect("notes.txt"), FileFormat::Other);
        assert_eq!(FileFormat::detect("csv"), FileFormat::Other);
        assert_eq!(FileFormat::detect("archive.csv.gz"), FileFormat::Other);
    }

    #[test]
    fn test_unknown_extension_falls_back_to_content() {
        let table = parse("notes.txt", b"hello world");

        assert_eq!(table.columns, vec!["content".to_string()]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.value(0, "content"), Some(&CellValue::text("hello world")));
        assert_eq!(table.stats.len(), 1);
        assert_eq!(table.stats[0].unique_count, 1);
    }

    #[test]
    fn test_fallback_truncates_to_200_chars() {
        let text = "x".repeat(500);
        let table = parse("big.log", text.as_bytes());
        let CellValue::Text(content) = &table.rows[0]["content"] else {
            panic!("expected text content");
        };
        assert_eq!(content.chars().count(), 200);
    }

    #[test]
    fn test_fallback_chars_option() {
        let options = ParseOptions {
            fallback_chars: 5,
            ..ParseOptions::default()
        };
        let table = parse_with_config("a.md", "héllo world".as_bytes(), &options);
        assert_eq!(table.rows[0]["content"], CellValue::text("héllo"));
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let table = parse("broken.json", b"{not json");
        assert_eq!(table.columns, vec!["content".to_string()]);
        assert_eq!(table.rows[0]["content"], CellValue::text("{not json"));
    }

    #[test]
    fn test_json_null_is_not_a_failure() {
        let table = parse("empty.json", b"null");
        assert!(table.columns.is_empty());
        assert_eq!(table.rows, vec![Row::new()]);
        assert!(table.stats.is_empty());
    }

    #[test]
    fn test_invalid_xlsx_falls_back() {
        let table = parse("book.xlsx", b"plain text, not a zip");
        assert_eq!(table.columns, vec!["content".to_string()]);
        assert_eq!(
            table.rows[0]["content"],
            CellValue::text("plain text, not a zip")
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let table = parse("notes.txt", &[b'a', 0xFF, b'b']);
        assert_eq!(table.rows[0]["content"], CellValue::text("a\u{FFFD}b"));
    }

    #[test]
    fn test_stats_are_attached() {
        let table = parse("people.csv", b"name,age\nAnn,30\n,41\n");
        assert_eq!(table.stats.len(), 2);
        assert_eq!(table.stat("name").map(|s| s.missing_count), Some(1));
    }

    #[test]
    fn test_semicolon_delimiter_option() {
        let options = ParseOptions {
            csv_delimiter: b';',
            ..ParseOptions::default()
        };
        let table = parse_with_config("eu.csv", b"a;b\n1;2\n", &options);
        assert_eq!(table.columns, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(table.rows[0]["b"], CellValue::text("2"));
    }
}
