//! Error types for the Tablewright library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Tablewright operations.
///
/// These are operation-level failures: when one is returned, no dataset of
/// the session has been changed. Row-level formula faults never surface
/// here; they are written into the derived column instead.
#[derive(Debug, Error)]
pub enum TablewrightError {
    /// No dataset has been loaded into the session.
    #[error("No data loaded")]
    NotLoaded,

    /// The dataset selected for export is empty.
    #[error("No data: {0}")]
    NoData(String),

    /// Hierarchy assignment was requested without any columns.
    #[error("No columns selected for hierarchy")]
    NoColumnsSelected,

    /// A derived column needs a non-empty name.
    #[error("Column name must not be empty")]
    EmptyColumnName,

    /// Formula or aggregate function name that is not in the built-in set.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Comparison operator that is not in the built-in set.
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Unknown view name.
    #[error("Unknown view: {0}")]
    UnknownView(String),

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error reading an XLSX workbook.
    #[error("XLSX read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    /// Error writing an XLSX workbook.
    #[error("XLSX write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Empty file or no rows to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A pipeline step failed.
    #[error("Pipeline step {step} ({op}) failed: {source}")]
    Pipeline {
        step: usize,
        op: String,
        #[source]
        source: Box<TablewrightError>,
    },
}

/// Result type alias for Tablewright operations.
pub type Result<T> = std::result::Result<T, TablewrightError>;
