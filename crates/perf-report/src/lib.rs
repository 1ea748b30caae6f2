//! Measurement capture and reporting for the Ed-Fi performance test tools.
//!
//! Every tool in the suite records one [`measurement::PageMeasurement`] (or
//! [`measurement::QueryMeasurement`]) per HTTP request into a shared
//! [`log::RequestLog`], and at the end of a run converts the log into two
//! tabular outputs: a detail table with one row per request, and a summary
//! table with grouped aggregate statistics. The [`reporter`] module writes
//! both as CSV or JSON files under an output directory keyed by run
//! timestamp.

pub mod error;
pub mod format;
pub mod log;
pub mod measurement;
pub mod reporter;
pub mod summary;

pub use error::ReportError;
pub use format::{LogLevel, OutputFormat};
pub use log::RequestLog;
pub use measurement::{MeasurementRow, PageMeasurement, QueryMeasurement};
pub use reporter::{run_key, Reporter, RunMetadata};
pub use summary::{summarize, SummaryRow};
