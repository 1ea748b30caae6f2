//! The volume tool.
//!
//! Simulated users hammer the API with create/update/delete chains against
//! randomly chosen catalog resources until the run duration elapses. All
//! users share one resolver, so the shared schools are created once and
//! every user's payloads reference them.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Args};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use edfi_client::ApiClient;
use edfi_resources::{Registry, Resolver, ResourceKind};
use perf_report::{run_key, summarize, PageMeasurement, Reporter, RequestLog, RunMetadata};

use crate::config::{ApiArgs, OutputArgs};
use crate::fatal;
use crate::pipeclean::error_status;

#[derive(Debug, Args)]
pub struct VolumeArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Number of simulated users
    #[arg(long = "users", env = "PERF_VOLUME_USERS", default_value_t = 5)]
    pub users: usize,

    /// Run duration in seconds
    #[arg(long = "duration", env = "PERF_TEST_DURATION", default_value_t = 30)]
    pub duration: u64,

    /// Delete created resources at the end of each chain
    #[arg(
        long = "delete-resources",
        env = "PERF_DELETE_RESOURCES",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub delete_resources: bool,
}

pub async fn run(args: VolumeArgs) -> anyhow::Result<()> {
    let client = args.api.connect().await?;
    let registry = Arc::new(Registry::new());
    let resolver = Arc::new(Resolver::new(
        client as Arc<dyn ApiClient>,
        registry.clone(),
    ));
    let log = RequestLog::<PageMeasurement>::new();

    let kinds = kinds_for_run(&registry, &args.output.resource_list)?;
    anyhow::ensure!(!kinds.is_empty(), "no writable resources selected");

    let deadline = Instant::now() + Duration::from_secs(args.duration);
    let mut handles = Vec::with_capacity(args.users);
    for user in 0..args.users {
        let resolver = resolver.clone();
        let log = log.clone();
        let kinds = kinds.clone();
        let delete_resources = args.delete_resources;
        handles.push(tokio::spawn(async move {
            user_loop(user, &resolver, &log, &kinds, deadline, delete_resources).await;
        }));
    }
    for handle in handles {
        if handle.await.is_err() {
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
        "volume reports written"
    );
    Ok(())
}

/// Writable catalog kinds this run targets.
fn kinds_for_run(registry: &Registry, names: &[String]) -> anyhow::Result<Vec<ResourceKind>> {
    let writable = |kind: &ResourceKind| {
        registry
            .get(*kind)
            .map(|d| !d.read_only)
            .unwrap_or(false)
    };
    if names.is_empty() {
        return Ok(registry.kinds().filter(|k| writable(k)).collect());
    }
    let mut kinds = Vec::with_capacity(names.len());
    for name in names {
        let kind = name
            .parse::<ResourceKind>()
            .map_err(|e| anyhow::anyhow!(e))?;
        if writable(&kind) {
            kinds.push(kind);
        } else {
            tracing::warn!(resource = %kind, "skipping read-only resource in volume run");
        }
    }
    Ok(kinds)
}

/// One user's lifetime: pick a kind, create, update, delete, repeat until
/// the deadline. A failed chain raises the fatal flag but the user keeps
/// going; sustained load matters more than any one chain.
async fn user_loop(
    user: usize,
    resolver: &Resolver,
    log: &RequestLog<PageMeasurement>,
    kinds: &[ResourceKind],
    deadline: Instant,
    delete_resources: bool,
) {
    let mut rng = StdRng::seed_from_u64(user as u64);
    let mut sequence = 0u64;
    while Instant::now() < deadline {
        let kind = kinds[rng.gen_range(0..kinds.len())];
        let endpoint = kind.endpoint();

        sequence += 1;
        let started = Instant::now();
        let mut instance = match resolver.create_with_dependencies(kind, &[]).await {
            Ok(instance) => {
                record(log, endpoint, sequence, 1, started, instance.status);
                instance
            }
            Err(e) => {
                record(log, endpoint, sequence, 0, started, error_status(&e));
                tracing::error!(user, resource = endpoint, error = %e, "create failed");
                fatal::fire();
                continue;
            }
        };

        sequence += 1;
        let started = Instant::now();
        match resolver.update(&mut instance).await {
            Ok(Some(status)) => record(log, endpoint, sequence, 1, started, status),
            Ok(None) => {}
            Err(e) => {
                record(log, endpoint, sequence, 0, started, error_status(&e));
                tracing::error!(user, resource = endpoint, error = %e, "update failed");
                fatal::fire();
                continue;
            }
        }

        if delete_resources {
            sequence += 1;
            let started = Instant::now();
            match resolver.delete_with_dependencies(&instance).await {
                Ok(status) => record(log, endpoint, sequence, 1, started, status),
                Err(e) => {
                    record(log, endpoint, sequence, 0, started, error_status(&e));
                    tracing::error!(user, resource = endpoint, error = %e, "delete failed");
                    fatal::fire();
                }
            }
        }
    }
}

fn record(
    log: &RequestLog<PageMeasurement>,
    endpoint: &str,
    sequence: u64,
    records: u64,
    started: Instant,
    status: u16,
) {
    log.append(PageMeasurement {
        resource: endpoint.to_string(),
        url: String::new(),
        page_number: sequence,
        page_size: 0,
        number_of_records: records,
        elapsed_time: started.elapsed().as_secs_f64(),
        status_code: status,
    });
}
