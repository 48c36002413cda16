//! Error types for the amrscope library.

use std::path::PathBuf;
use thiserror::Error;

use crate::stats::ContingencyTable;

/// Main error type for amrscope operations.
#[derive(Debug, Error)]
pub enum AmrError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Columns required by the category configuration, or a configured
    /// identifier column, are absent from the input header.
    #[error("Missing required column(s): {}", columns.join(", "))]
    MissingColumn { columns: Vec<String> },

    /// Two header columns normalize to the same drug name.
    #[error("Ambiguous header: columns '{first}' and '{second}' both match drug '{drug}'")]
    DuplicateColumn {
        drug: String,
        first: String,
        second: String,
    },

    /// An interpretation code outside {S, I, R, missing}.
    #[error("Invalid interpretation '{value}' at row {row}, column '{column}' (expected S, I, R or a missing marker)")]
    InvalidInterpretation {
        row: usize,
        column: String,
        value: String,
    },

    /// The contingency table has an empty row or column, so the exact test
    /// and odds ratio are undefined.
    #[error("Degenerate contingency table ({}): {table}", empty.join(", "))]
    DegenerateTable {
        table: ContingencyTable,
        empty: Vec<String>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure while writing or reading a report or export file.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for amrscope operations.
pub type Result<T> = std::result::Result<T, AmrError>;
