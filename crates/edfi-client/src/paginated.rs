//! Result of one paginated or filtered read.

use serde_json::Value;

/// One page (or filtered read) of a resource collection, together with the
/// request timing the measurement pipeline records.
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Resource endpoint name this page belongs to.
    pub resource: String,
    /// Full request URL, for diagnostics.
    pub url: String,
    /// 1-indexed page number of the request (1 for filtered reads).
    pub page: u64,
    /// Requested page size.
    pub page_size: u64,
    /// Records returned by the server. Empty on error statuses.
    pub records: Vec<Value>,
    /// HTTP status code of the response.
    pub status: u16,
    /// Wall-clock seconds spent on the request, including body read.
    pub elapsed: f64,
}

impl PageResult {
    pub fn record_count(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the page came back shorter than requested, meaning the
    /// collection is exhausted.
    pub fn is_last_page(&self) -> bool {
        self.record_count() < self.page_size
    }
}
