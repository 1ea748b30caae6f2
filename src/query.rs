//! The filtered query tool.
//!
//! Measures how collection reads degrade as query filters stack up. For
//! each resource the tool fetches a sample page, derives filterable fields
//! from the first record, then issues one GET per filter-set size, filter
//! values taken from the sample record so each query should match at
//! least that record.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde_json::Value;
use tokio::sync::Semaphore;

use edfi_client::{ClientError, RequestClient};
use perf_report::{run_key, summarize, QueryMeasurement, Reporter, RequestLog, RunMetadata};

use crate::config::{ApiArgs, OutputArgs};
use crate::fatal;

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Largest filter-set size tried per resource
    #[arg(long = "max-filters", env = "PERF_MAX_FILTERS", default_value_t = 3)]
    pub max_filters: u64,
}

pub async fn run(args: QueryArgs) -> anyhow::Result<()> {
    let client = args.api.connect().await?;
    let resources = args.output.resolve_resources(&client).await?;
    let log = RequestLog::<QueryMeasurement>::new();

    let semaphore = Arc::new(Semaphore::new(args.api.connection_limit.max(1)));
    let mut handles = Vec::with_capacity(resources.len());
    for resource in resources.clone() {
        let client = client.clone();
        let log = log.clone();
        let semaphore = semaphore.clone();
        let page_size = args.output.page_size;
        let max_filters = args.max_filters;
        handles.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("query semaphore closed");
            if let Err(e) = query_resource(&client, &log, &resource, page_size, max_filters).await {
                tracing::error!(resource = %resource, error = %e, "query run failed");
                fatal::fire();
            }
        }));
    }
    for handle in handles {
        if handle.await.is_err() {
            fatal::fire();
        }
    }

    let detail = log.detail().context("no queries were measured")?;
    let summary = summarize(&detail)?;
    let reporter =
        Reporter::new(&args.output.output_dir, &run_key(), args.output.format).with_query_columns();
    let detail_path = reporter.write_detail(&detail)?;
    let summary_path = reporter.write_summary(&summary)?;
    reporter.write_run_metadata(&RunMetadata::new(
        reporter.run_name(),
        &args.api.base_url,
        &args.output.description,
        &resources,
        args.output.page_size,
    ))?;
    tracing::info!(
        detail = %detail_path.display(),
        summary = %summary_path.display(),
        "query reports written"
    );
    Ok(())
}

async fn query_resource(
    client: &RequestClient,
    log: &RequestLog<QueryMeasurement>,
    resource: &str,
    page_size: u64,
    max_filters: u64,
) -> Result<(), ClientError> {
    let sample = client.get_page(resource, 1, page_size).await?;
    if !sample.is_success() {
        tracing::error!(resource, status = sample.status, "sample fetch failed");
        return Ok(());
    }
    let Some(record) = sample.records.first() else {
        tracing::warn!(resource, "collection is empty, nothing to filter on");
        return Ok(());
    };

    let fields = filterable_fields(record);
    if fields.is_empty() {
        tracing::warn!(resource, "no filterable fields in the sample record");
        return Ok(());
    }

    let limit = (max_filters as usize).min(fields.len());
    for count in 1..=limit {
        let params: Vec<(String, String)> = fields[..count].to_vec();
        let result = client.query(resource, &params).await?;
        let records = result.record_count();
        let success = result.is_success();
        log.append(QueryMeasurement {
            resource: result.resource,
            url: result.url,
            sequence: count as u64,
            filter_count: count as u64,
            number_of_records: records,
            elapsed_time: result.elapsed,
            status_code: result.status,
        });
        if success && records == 0 {
            tracing::warn!(resource, filters = count, "filtered read matched no records");
        }
    }
    Ok(())
}

/// Top-level scalar fields usable as query parameters, with the sample
/// record's values. Identity and bookkeeping fields are skipped; values
/// are minimally percent-encoded for URL use.
fn filterable_fields(record: &Value) -> Vec<(String, String)> {
    let Some(object) = record.as_object() else {
        return Vec::new();
    };
    object
        .iter()
        .filter(|(name, _)| *name != "id" && *name != "_etag" && *name != "link")
        .filter_map(|(name, value)| {
            let rendered = match value {
                Value::String(s) => encode_query_value(s),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((name.clone(), rendered))
        })
        .collect()
}

fn encode_query_value(value: &str) -> String {
    value
        .chars()
        .flat_map(|c| match c {
            ' ' => "%20".chars().collect::<Vec<_>>(),
            '#' => "%23".chars().collect(),
            '&' => "%26".chars().collect(),
            '+' => "%2B".chars().collect(),
            '=' => "%3D".chars().collect(),
            '?' => "%3F".chars().collect(),
            other => vec![other],
        })
        .collect()
}
