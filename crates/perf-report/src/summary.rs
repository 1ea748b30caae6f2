//! Grouped aggregate statistics over a measurement log.

use crate::error::ReportError;
use crate::measurement::MeasurementRow;
use std::collections::BTreeMap;

/// One summary row: aggregates for a (resource, group) pair, where the
/// group is the page size for paging runs and the filter count for query
/// runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub resource: String,
    pub group: u64,
    /// Count of successful requests (status < 400).
    pub number_of_pages: u64,
    pub number_of_records: u64,
    pub total_time: f64,
    /// Mean elapsed time over every request in the group, error responses
    /// included; only the success/error counts are status-filtered.
    pub mean_time: f64,
    /// Sample standard deviation (n-1 denominator) of elapsed time,
    /// rounded to 6 decimals. Zero when the group holds a single request.
    pub st_deviation: f64,
    /// Count of error requests (status >= 400).
    pub number_of_errors: u64,
}

/// Aggregate measurements into summary rows, grouped by (resource, group)
/// and ordered by resource name ascending then group ascending.
///
/// An empty input is rejected: a summary of zero observations would only
/// hide a broken run.
pub fn summarize<M: MeasurementRow>(rows: &[M]) -> Result<Vec<SummaryRow>, ReportError> {
    if rows.is_empty() {
        return Err(ReportError::NoMeasurements);
    }

    // BTreeMap keys give the deterministic output ordering for free.
    let mut groups: BTreeMap<(String, u64), Vec<&M>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.resource().to_string(), row.group()))
            .or_default()
            .push(row);
    }

    let summary = groups
        .into_iter()
        .map(|((resource, group), members)| {
            let elapsed: Vec<f64> = members.iter().map(|m| m.elapsed()).collect();
            let total_time: f64 = elapsed.iter().sum();
            let mean_time = total_time / elapsed.len() as f64;

            SummaryRow {
                resource,
                group,
                number_of_pages: members.iter().filter(|m| !m.is_error()).count() as u64,
                number_of_records: members.iter().map(|m| m.number_of_records()).sum(),
                total_time,
                mean_time,
                st_deviation: round6(sample_std_dev(&elapsed, mean_time)),
                number_of_errors: members.iter().filter(|m| m.is_error()).count() as u64,
            }
        })
        .collect();

    Ok(summary)
}

fn sample_std_dev(samples: &[f64], mean: f64) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
    variance.sqrt()
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
