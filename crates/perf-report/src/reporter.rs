//! Detail and summary report writers.
//!
//! A run produces files under the configured output directory, all named by
//! a run key derived from the start timestamp:
//!
//! - `<run>.detail.csv` / `.json` - one row per request
//! - `<run>.summary.csv` / `.json` - grouped aggregate statistics
//! - `<run>.run.json` - run configuration metadata

use crate::error::ReportError;
use crate::format::OutputFormat;
use crate::measurement::MeasurementRow;
use crate::summary::SummaryRow;
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Run key for output file names, e.g. `2024-03-07-14-22-05`.
pub fn run_key() -> String {
    Local::now().format("%Y-%m-%d-%H-%M-%S").to_string()
}

/// Run configuration echoed into `<run>.run.json` so a result directory is
/// self-describing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunMetadata {
    pub run_name: String,
    pub machine_name: String,
    pub base_url: String,
    pub description: String,
    pub resource_list: Vec<String>,
    pub page_size: u64,
}

impl RunMetadata {
    pub fn new(
        run_name: &str,
        base_url: &str,
        description: &str,
        resource_list: &[String],
        page_size: u64,
    ) -> Self {
        Self {
            run_name: run_name.to_string(),
            machine_name: hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "unknown".to_string()),
            base_url: base_url.to_string(),
            description: description.to_string(),
            resource_list: if resource_list.is_empty() {
                vec!["all".to_string()]
            } else {
                resource_list.to_vec()
            },
            page_size,
        }
    }
}

/// Writes detail and summary tables for one run.
pub struct Reporter {
    output_dir: PathBuf,
    run_name: String,
    format: OutputFormat,
    /// Header for the group column in summaries: `PageSize` for paging
    /// runs, `NumberOfQueryFilters` for query runs.
    group_column: &'static str,
}

impl Reporter {
    pub fn new(output_dir: &Path, run_name: &str, format: OutputFormat) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            run_name: run_name.to_string(),
            format,
            group_column: "PageSize",
        }
    }

    /// Use the filtered-query group column name instead of `PageSize`.
    pub fn with_query_columns(mut self) -> Self {
        self.group_column = "NumberOfQueryFilters";
        self
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Write the per-request detail table.
    pub fn write_detail<M: MeasurementRow + Serialize>(
        &self,
        rows: &[M],
    ) -> Result<PathBuf, ReportError> {
        self.ensure_output_dir()?;
        let path = self.file_path("detail");
        match self.format {
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_path(&path)?;
                for row in rows {
                    writer.serialize(row)?;
                }
                writer.flush()?;
            }
            OutputFormat::Json => {
                fs::write(&path, serde_json::to_string_pretty(rows)?)?;
            }
        }
        tracing::info!("Wrote detail report to {}", path.display());
        Ok(path)
    }

    /// Write the grouped summary table.
    pub fn write_summary(&self, rows: &[SummaryRow]) -> Result<PathBuf, ReportError> {
        self.ensure_output_dir()?;
        let path = self.file_path("summary");
        match self.format {
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_path(&path)?;
                writer.write_record([
                    "Resource",
                    self.group_column,
                    "NumberOfPages",
                    "NumberOfRecords",
                    "TotalTime",
                    "MeanTime",
                    "StDeviation",
                    "NumberOfErrors",
                ])?;
                for row in rows {
                    writer.write_record([
                        row.resource.clone(),
                        row.group.to_string(),
                        row.number_of_pages.to_string(),
                        row.number_of_records.to_string(),
                        row.total_time.to_string(),
                        row.mean_time.to_string(),
                        row.st_deviation.to_string(),
                        row.number_of_errors.to_string(),
                    ])?;
                }
                writer.flush()?;
            }
            OutputFormat::Json => {
                let objects: Vec<serde_json::Value> =
                    rows.iter().map(|row| self.summary_json(row)).collect();
                fs::write(&path, serde_json::to_string_pretty(&objects)?)?;
            }
        }
        tracing::info!("Wrote summary report to {}", path.display());
        Ok(path)
    }

    /// Write the run metadata file (always JSON).
    pub fn write_run_metadata(&self, metadata: &RunMetadata) -> Result<PathBuf, ReportError> {
        self.ensure_output_dir()?;
        let path = self.output_dir.join(format!("{}.run.json", self.run_name));
        fs::write(&path, serde_json::to_string_pretty(metadata)?)?;
        Ok(path)
    }

    fn summary_json(&self, row: &SummaryRow) -> serde_json::Value {
        serde_json::json!({
            "Resource": row.resource,
            self.group_column: row.group,
            "NumberOfPages": row.number_of_pages,
            "NumberOfRecords": row.number_of_records,
            "TotalTime": row.total_time,
            "MeanTime": row.mean_time,
            "StDeviation": row.st_deviation,
            "NumberOfErrors": row.number_of_errors,
        })
    }

    fn file_path(&self, kind: &str) -> PathBuf {
        let extension = self.format.to_string();
        self.output_dir
            .join(format!("{}.{kind}.{extension}", self.run_name))
    }

    fn ensure_output_dir(&self) -> Result<(), ReportError> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::PageMeasurement;
    use crate::summary::summarize;

    fn sample_rows() -> Vec<PageMeasurement> {
        vec![
            PageMeasurement {
                resource: "schools".to_string(),
                url: "http://localhost/data/v3/ed-fi/schools".to_string(),
                page_number: 1,
                page_size: 100,
                number_of_records: 37,
                elapsed_time: 0.25,
                status_code: 200,
            },
            PageMeasurement {
                resource: "students".to_string(),
                url: "http://localhost/data/v3/ed-fi/students".to_string(),
                page_number: 1,
                page_size: 100,
                number_of_records: 100,
                elapsed_time: 0.5,
                status_code: 200,
            },
        ]
    }

    #[test]
    fn writes_detail_csv_with_expected_columns() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "test-run", OutputFormat::Csv);
        let path = reporter.write_detail(&sample_rows()).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Resource,PageNumber,PageSize,NumberOfRecords,ElapsedTime,StatusCode"
        );
        assert_eq!(lines.next().unwrap(), "schools,1,100,37,0.25,200");
    }

    #[test]
    fn writes_summary_csv_with_expected_columns() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "test-run", OutputFormat::Csv);
        let summary = summarize(&sample_rows()).unwrap();
        let path = reporter.write_summary(&summary).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Resource,PageSize,NumberOfPages,NumberOfRecords,TotalTime,MeanTime,StDeviation,NumberOfErrors"
        );
        assert_eq!(lines.next().unwrap(), "schools,100,1,37,0.25,0.25,0,0");
    }

    #[test]
    fn json_format_writes_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = Reporter::new(dir.path(), "test-run", OutputFormat::Json);
        let path = reporter.write_detail(&sample_rows()).unwrap();
        assert!(path.to_string_lossy().ends_with("test-run.detail.json"));

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed[0]["Resource"], "schools");
        assert_eq!(parsed[0]["NumberOfRecords"], 37);
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("nested");
        let reporter = Reporter::new(&nested, "test-run", OutputFormat::Csv);
        reporter.write_detail(&sample_rows()).unwrap();
        assert!(nested.exists());
    }
}
