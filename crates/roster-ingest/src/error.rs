//! Error types for roster ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a roster.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Roster file not found.
    #[error("roster file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the roster file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Malformed CSV content.
    #[error("failed to parse CSV: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    // === Layout Errors ===
    /// Row numbers are 1-based.
    #[error("row numbers start at 1, got {row}")]
    InvalidRowNumber { row: usize },

    /// The configured header row does not exist.
    #[error("header row {row} is past the end of the file ({rows} rows)")]
    HeaderRowOutOfRange { row: usize, rows: usize },

    /// The configured first data row does not exist.
    #[error("data start row {row} is past the end of the file ({rows} rows)")]
    DataStartOutOfRange { row: usize, rows: usize },

    /// A column resolved to an index the file does not have.
    #[error("column {column} is out of range ({width} columns)")]
    ColumnOutOfRange { column: String, width: usize },

    /// A column referenced by header name is missing.
    #[error("no column named '{name}'")]
    UnknownColumn { name: String },

    /// Spreadsheet column letters are A-Z only.
    #[error("invalid column letter '{value}'")]
    InvalidColumnLetter { value: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
