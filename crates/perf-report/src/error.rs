//! Error types for measurement logging and reporting.

use thiserror::Error;

/// Errors that can occur while aggregating or writing reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Summarization was requested on an empty measurement log. There is no
    /// meaningful summary of zero observations, so this is surfaced instead
    /// of silently producing an all-zero table.
    #[error("no measurements have been captured, cannot create a report")]
    NoMeasurements,

    /// CSV serialization or write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error while creating the output directory or files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
