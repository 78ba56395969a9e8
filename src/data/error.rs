//! Error types for loading and filtering rental records.

use std::path::PathBuf;

use chrono::NaiveDate;

/// Errors that make a source file unusable.  Any of these aborts the load:
/// no partial dataset is ever produced.
#[derive(Debug, thiserror::Error)]
pub enum DataFormatError {
    /// The file could not be opened or read.
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The CSV parser rejected a record.
    #[error("CSV parse error in {path}")]
    Csv { path: PathBuf, source: csv::Error },

    /// The JSON document is malformed.
    #[error("JSON parse error in {path}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The Parquet footer or a row group could not be decoded.
    #[error("Parquet error in {path}")]
    Parquet {
        path: PathBuf,
        source: parquet::errors::ParquetError,
    },

    /// A record batch could not be decoded.
    #[error("Arrow error in {path}")]
    Arrow {
        path: PathBuf,
        source: arrow::error::ArrowError,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    /// JSON input must be a records-oriented array of objects.
    #[error("expected a JSON array of objects, row {row} is not an object")]
    NotAnArray { row: usize },

    #[error("row {row}: missing required column '{column}'")]
    MissingColumn { row: usize, column: &'static str },

    #[error("row {row}: '{raw}' is not a valid date")]
    InvalidDate { row: usize, raw: String },

    #[error("row {row}, column '{column}': invalid value '{raw}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        raw: String,
    },
}

/// Reported when the chosen start date lies after the end date.
///
/// This is recoverable: the filter clamps the window to the start date and
/// carries on, the error only tells the user what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("start date {from} is after end date {to}, showing {from} only")]
pub struct InvalidRangeError {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
