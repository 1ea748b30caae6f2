//! Per-request measurement records.

use serde::Serialize;

/// HTTP statuses at or above this value count as errors in summaries.
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

/// Common view over the two measurement variants, used by the aggregator
/// and the detail writers.
pub trait MeasurementRow: Clone {
    /// Resource endpoint name, e.g. `students`.
    fn resource(&self) -> &str;
    /// Ordering index within the resource (page number or query sequence).
    fn sequence(&self) -> u64;
    /// Grouping key alongside the resource: page size for paging runs,
    /// filter count for query runs.
    fn group(&self) -> u64;
    /// Records returned by the request.
    fn number_of_records(&self) -> u64;
    /// Wall-clock request time in seconds.
    fn elapsed(&self) -> f64;
    /// HTTP status code of the response.
    fn status_code(&self) -> u16;

    fn is_error(&self) -> bool {
        self.status_code() >= ERROR_STATUS_THRESHOLD
    }
}

/// One page fetch during a paging sweep. Immutable once recorded.
#[derive(Debug, Clone, Serialize)]
pub struct PageMeasurement {
    #[serde(rename = "Resource")]
    pub resource: String,
    #[serde(skip_serializing)]
    pub url: String,
    #[serde(rename = "PageNumber")]
    pub page_number: u64,
    #[serde(rename = "PageSize")]
    pub page_size: u64,
    #[serde(rename = "NumberOfRecords")]
    pub number_of_records: u64,
    #[serde(rename = "ElapsedTime")]
    pub elapsed_time: f64,
    #[serde(rename = "StatusCode")]
    pub status_code: u16,
}

impl MeasurementRow for PageMeasurement {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn sequence(&self) -> u64 {
        self.page_number
    }

    fn group(&self) -> u64 {
        self.page_size
    }

    fn number_of_records(&self) -> u64 {
        self.number_of_records
    }

    fn elapsed(&self) -> f64 {
        self.elapsed_time
    }

    fn status_code(&self) -> u16 {
        self.status_code
    }
}

/// One filtered read during a query test run. Immutable once recorded.
#[derive(Debug, Clone, Serialize)]
pub struct QueryMeasurement {
    #[serde(rename = "Resource")]
    pub resource: String,
    #[serde(skip_serializing)]
    pub url: String,
    /// Sequence of the request within this resource's run.
    #[serde(rename = "QuerySequence")]
    pub sequence: u64,
    #[serde(rename = "NumberOfQueryFilters")]
    pub filter_count: u64,
    #[serde(rename = "NumberOfRecords")]
    pub number_of_records: u64,
    #[serde(rename = "ElapsedTime")]
    pub elapsed_time: f64,
    #[serde(rename = "StatusCode")]
    pub status_code: u16,
}

impl MeasurementRow for QueryMeasurement {
    fn resource(&self) -> &str {
        &self.resource
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn group(&self) -> u64 {
        self.filter_count
    }

    fn number_of_records(&self) -> u64 {
        self.number_of_records
    }

    fn elapsed(&self) -> f64 {
        self.elapsed_time
    }

    fn status_code(&self) -> u16 {
        self.status_code
    }
}
