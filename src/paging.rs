//! The paging sweep tool.
//!
//! Walks every page of each resource collection with `offset`/`limit`
//! windows and measures each fetch. A sweep ends when a page comes back
//! short (the collection is exhausted), when the API returns an error
//! status (recorded, not retried), or at the `--max-pages` bound.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tokio::sync::Semaphore;

use edfi_client::{ClientError, RequestClient};
use perf_report::{run_key, summarize, PageMeasurement, Reporter, RequestLog, RunMetadata};

use crate::config::{ApiArgs, OutputArgs};
use crate::fatal;

#[derive(Debug, Args)]
pub struct PagingArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Hard upper bound on pages fetched per resource
    #[arg(long = "max-pages", env = "PERF_MAX_PAGES", default_value_t = 10_000)]
    pub max_pages: u64,
}

pub async fn run(args: PagingArgs) -> anyhow::Result<()> {
    let client = args.api.connect().await?;
    let resources = args.output.resolve_resources(&client).await?;
    let log = RequestLog::<PageMeasurement>::new();

    // The semaphore bounds how many resources sweep at once, which is the
    // tool's only source of request concurrency.
    let semaphore = Arc::new(Semaphore::new(args.api.connection_limit.max(1)));
    let mut handles = Vec::with_capacity(resources.len());
    for resource in resources.clone() {
        let client = client.clone();
        let log = log.clone();
        let semaphore = semaphore.clone();
        let page_size = args.output.page_size;
        let max_pages = args.max_pages;
        handles.push(tokio::spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("sweep semaphore closed");
            if let Err(e) = sweep_resource(&client, &log, &resource, page_size, max_pages).await {
                tracing::error!(resource = %resource, error = %e, "paging sweep failed");
                fatal::fire();
            }
        }));
    }
    for handle in handles {
        if handle.await.is_err() {
            fatal::fire();
        }
    }

    write_reports(&args, &resources, &log)?;
    Ok(())
}

/// Fetches pages of one resource until exhaustion, error, or the page
/// bound. Error statuses are recorded as the sweep's final measurement;
/// only transport failures bubble up.
async fn sweep_resource(
    client: &RequestClient,
    log: &RequestLog<PageMeasurement>,
    resource: &str,
    page_size: u64,
    max_pages: u64,
) -> Result<(), ClientError> {
    let expected_total = match client.get_total(resource).await {
        Ok(total) => Some(total),
        Err(e) => {
            tracing::warn!(resource, error = %e, "could not read total-count");
            None
        }
    };

    let mut fetched = 0u64;
    for page in 1..=max_pages {
        let result = client.get_page(resource, page, page_size).await?;
        let records = result.record_count();
        let success = result.is_success();
        let last = result.is_last_page();
        let status = result.status;
        fetched += records;
        log.append(PageMeasurement {
            resource: result.resource,
            url: result.url,
            page_number: result.page,
            page_size: result.page_size,
            number_of_records: records,
            elapsed_time: result.elapsed,
            status_code: status,
        });
        if !success {
            tracing::error!(resource, page, status, "page fetch failed, ending sweep");
            return Ok(());
        }
        if last {
            break;
        }
        if page == max_pages {
            tracing::warn!(resource, max_pages, "page bound reached before exhaustion");
        }
    }

    if let Some(total) = expected_total {
        if total != fetched {
            tracing::warn!(
                resource,
                expected = total,
                fetched,
                "record count does not match the total-count header"
            );
        }
    }
    Ok(())
}

fn write_reports(
    args: &PagingArgs,
    resources: &[String],
    log: &RequestLog<PageMeasurement>,
) -> anyhow::Result<()> {
    let detail = log.detail().context("no pages were measured")?;
    let summary = summarize(&detail)?;
    let reporter = Reporter::new(&args.output.output_dir, &run_key(), args.output.format);
    let detail_path = reporter.write_detail(&detail)?;
    let summary_path = reporter.write_summary(&summary)?;
    reporter.write_run_metadata(&RunMetadata::new(
        reporter.run_name(),
        &args.api.base_url,
        &args.output.description,
        resources,
        args.output.page_size,
    ))?;
    tracing::info!(
        detail = %detail_path.display(),
        summary = %summary_path.display(),
        "paging reports written"
    );
    Ok(())
}
