//! Delimited-text reader for susceptibility tables.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataTable, SourceMetadata};
use crate::error::{AmrError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Number of non-blank lines sampled for delimiter detection.
const DETECTION_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Reads isolate tables from CSV/TSV-like files.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table with its source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| AmrError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.parse_bytes(&contents)?;
        let format = format_name(table.delimiter).to_string();

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            format = %format,
            "parsed input table"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse in-memory bytes, detecting the delimiter unless one is configured.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.read_records(bytes, delimiter)
    }

    fn read_records(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }

            let record = result?;
            if headers.is_empty() {
                headers = (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect();
            }

            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        if headers.iter().all(|h| h.is_empty()) {
            return Err(AmrError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(AmrError::EmptyData("No data rows found".to_string()));
        }

        Ok(DataTable::new(headers, rows, delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Short format label for a delimiter.
pub fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Pick the delimiter whose per-line count is highest and most consistent.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .take(DETECTION_LINES)
        .collect();

    if lines.is_empty() {
        return Err(AmrError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best = (b',', 0usize);
    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first = counts[0];
        if first == 0 {
            continue;
        }

        // Tab wins ties; it rarely occurs inside drug names.
        let score = if counts.iter().all(|&c| c == first) {
            first * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first
        };

        if score > best.1 {
            best = (delim, score);
        }
    }

    Ok(best.0)
}

/// Count delimiter occurrences in a line, ignoring quoted sections.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut in_quotes = false;
    let mut count = 0;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"isolate_id,amikacin,colistin\nA1,S,R\nA2,R,S";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"isolate_id\tamikacin\tcolistin\nA1\tS\tR\nA2\tR\tS";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_quoted_delimiters_ignored() {
        let data = b"id;\"amoxicillin, clavulanate\"\nA1;S\nA2;R";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_bytes_pads_short_rows() {
        let parser = Parser::new();
        let table = parser
            .parse_bytes(b"isolate_id,amikacin,colistin\nA1,S\nA2,R,R")
            .unwrap();

        assert_eq!(table.headers, vec!["isolate_id", "amikacin", "colistin"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 2), Some(""));
        assert_eq!(table.get(1, 2), Some("R"));
    }

    #[test]
    fn test_parse_bytes_without_header() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_bytes(b"A1,S,R\nA2,R,S").unwrap();
        assert_eq!(table.headers, vec!["column_1", "column_2", "column_3"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_parse_bytes_respects_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..ParserConfig::default()
        });
        let table = parser.parse_bytes(b"id,amikacin\nA1,S\nA2,R\nA3,R").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_header_only_is_empty() {
        let parser = Parser::new();
        let err = parser.parse_bytes(b"id,amikacin\n").unwrap_err();
        assert!(matches!(err, AmrError::EmptyData(_)));
    }

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("n/a"));
        assert!(DataTable::is_null_value("null"));
        assert!(DataTable::is_null_value("."));
        assert!(DataTable::is_null_value("-"));
        assert!(!DataTable::is_null_value("R"));
        assert!(!DataTable::is_null_value("S"));
    }
}
