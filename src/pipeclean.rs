//! The pipeclean tool.
//!
//! A smoke test that walks every catalog resource through its full CRUD
//! cycle: GET list, POST (with prerequisites created on demand), GET
//! detail, PUT, DELETE. Resources run sequentially so a dependency storm
//! from one kind cannot mask another kind's failure. Read-only kinds get
//! the GET-only variant.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Args};

use edfi_client::{ApiClient, RequestClient};
use edfi_resources::{Registry, ResolveError, Resolver, ResourceKind};
use perf_report::{run_key, summarize, PageMeasurement, Reporter, RequestLog, RunMetadata};

use crate::config::{ApiArgs, OutputArgs};
use crate::fatal;

#[derive(Debug, Args)]
pub struct PipecleanArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Delete created resources at the end of each cycle
    #[arg(
        long = "delete-resources",
        env = "PERF_DELETE_RESOURCES",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub delete_resources: bool,
}

pub async fn run(args: PipecleanArgs) -> anyhow::Result<()> {
    let client = args.api.connect().await?;
    let registry = Arc::new(Registry::new());
    let resolver = Resolver::new(client.clone() as Arc<dyn ApiClient>, registry.clone());
    let log = RequestLog::<PageMeasurement>::new();

    let kinds = selected_kinds(&registry, &args.output.resource_list)?;
    for kind in &kinds {
        if let Err(e) = pipeclean_kind(&client, &resolver, &log, *kind, &args).await {
            tracing::error!(resource = %kind, error = %e, "pipeclean cycle failed");
            fatal::fire();
        }
    }

    let detail = log.detail().context("no requests were measured")?;
    let summary = summarize(&detail)?;
    let reporter = Reporter::new(&args.output.output_dir, &run_key(), args.output.format);
    let detail_path = reporter.write_detail(&detail)?;
    let summary_path = reporter.write_summary(&summary)?;
    reporter.write_run_metadata(&RunMetadata::new(
        reporter.run_name(),
        &args.api.base_url,
        &args.output.description,
        &kinds.iter().map(|k| k.to_string()).collect::<Vec<_>>(),
        args.output.page_size,
    ))?;
    tracing::info!(
        detail = %detail_path.display(),
        summary = %summary_path.display(),
        "pipeclean reports written"
    );
    Ok(())
}

/// The catalog kinds this run covers, in endpoint order. An explicit
/// `--resource-list` entry that no catalog kind matches is a
/// configuration error.
fn selected_kinds(registry: &Registry, names: &[String]) -> anyhow::Result<Vec<ResourceKind>> {
    if names.is_empty() {
        return Ok(registry.kinds().collect());
    }
    names
        .iter()
        .map(|name| {
            name.parse::<ResourceKind>()
                .map_err(|e| anyhow::anyhow!(e))
                .and_then(|kind| {
                    registry
                        .get(kind)
                        .map(|_| kind)
                        .ok_or_else(|| anyhow::anyhow!("{kind} is not in the catalog"))
                })
        })
        .collect()
}

/// One resource's cycle. A failed step records its measurement, ends the
/// cycle, and leaves later steps unmeasured.
async fn pipeclean_kind(
    client: &Arc<RequestClient>,
    resolver: &Resolver,
    log: &RequestLog<PageMeasurement>,
    kind: ResourceKind,
    args: &PipecleanArgs,
) -> Result<(), ResolveError> {
    let endpoint = kind.endpoint();
    let read_only = resolver
        .registry()
        .get(kind)
        .map(|d| d.read_only)
        .unwrap_or(false);
    tracing::info!(resource = endpoint, read_only, "pipeclean cycle starting");
    let mut step = StepLog::new(log, endpoint);

    // GET list, timed by the client itself.
    let page = client
        .get_page(endpoint, 1, args.output.page_size)
        .await
        .map_err(|source| ResolveError::Creation { kind, source })?;
    let list_ok = page.is_success();
    step.record(page.record_count(), page.elapsed, page.status);
    if !list_ok || read_only {
        return Ok(());
    }

    // POST. Elapsed time covers prerequisite creation as well; the cost
    // of a resource includes the graph it drags in.
    let started = Instant::now();
    let mut instance = match resolver.create_with_dependencies(kind, &[]).await {
        Ok(instance) => {
            step.record(1, started.elapsed().as_secs_f64(), instance.status);
            instance
        }
        Err(e) => {
            step.record(0, started.elapsed().as_secs_f64(), error_status(&e));
            return Err(e);
        }
    };

    // GET detail.
    let started = Instant::now();
    match client.get_item(endpoint, &instance.id).await {
        Ok(_) => step.record(1, started.elapsed().as_secs_f64(), 200),
        Err(source) => {
            let e = ResolveError::Creation { kind, source };
            step.record(0, started.elapsed().as_secs_f64(), error_status(&e));
            return Err(e);
        }
    }

    // PUT one mutated attribute, full payload. A kind without an update
    // attribute sends nothing, so nothing is measured.
    let started = Instant::now();
    match resolver.update(&mut instance).await {
        Ok(Some(status)) => step.record(1, started.elapsed().as_secs_f64(), status),
        Ok(None) => {}
        Err(e) => {
            step.record(0, started.elapsed().as_secs_f64(), error_status(&e));
            return Err(e);
        }
    }

    // DELETE the instance and its fresh prerequisites.
    if args.delete_resources {
        let started = Instant::now();
        match resolver.delete_with_dependencies(&instance).await {
            Ok(status) => step.record(1, started.elapsed().as_secs_f64(), status),
            Err(e) => {
                step.record(0, started.elapsed().as_secs_f64(), error_status(&e));
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Appends one measurement per cycle step, numbering steps from 1.
struct StepLog<'a> {
    log: &'a RequestLog<PageMeasurement>,
    endpoint: &'static str,
    step: u64,
}

impl<'a> StepLog<'a> {
    fn new(log: &'a RequestLog<PageMeasurement>, endpoint: &'static str) -> Self {
        StepLog {
            log,
            endpoint,
            step: 0,
        }
    }

    fn record(&mut self, records: u64, elapsed: f64, status: u16) {
        self.step += 1;
        self.log.append(PageMeasurement {
            resource: self.endpoint.to_string(),
            url: String::new(),
            page_number: self.step,
            page_size: 0,
            number_of_records: records,
            elapsed_time: elapsed,
            status_code: status,
        });
    }
}

pub(crate) fn error_status(error: &ResolveError) -> u16 {
    match error {
        ResolveError::Creation { source, .. }
        | ResolveError::Update { source, .. }
        | ResolveError::Deletion { source, .. } => source.status().unwrap_or(500),
        _ => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_resource_list_filters_the_catalog() {
        let registry = Registry::new();
        let kinds =
            selected_kinds(&registry, &["schools".to_string(), "students".to_string()]).unwrap();
        assert_eq!(kinds, vec![ResourceKind::School, ResourceKind::Student]);
    }

    #[test]
    fn unknown_resource_name_is_a_configuration_error() {
        let registry = Registry::new();
        assert!(selected_kinds(&registry, &["gradebooks".to_string()]).is_err());
    }

    #[test]
    fn empty_list_selects_the_whole_catalog() {
        let registry = Registry::new();
        let kinds = selected_kinds(&registry, &[]).unwrap();
        assert_eq!(kinds.len(), ResourceKind::all().len());
    }
}
