//! Command-line interface for edfi-perf-test
//!
//! # Usage Examples
//!
//! ## Paging sweep
//! ```bash
//! # Sweep every discoverable resource at page size 500
//! edfi-perf-test paging \
//!   --base-url https://localhost/WebApi \
//!   --key populatedSandbox --secret populatedSandboxSecret \
//!   --page-size 500 --ignore-certificates
//! ```
//!
//! ## Filtered queries
//! ```bash
//! edfi-perf-test query -b https://localhost/WebApi -k <key> -s <secret> \
//!   --resource-list schools,students --max-filters 3
//! ```
//!
//! ## Pipeclean and volume
//! ```bash
//! # CRUD smoke test over the whole catalog
//! edfi-perf-test pipeclean -b ... -k ... -s ...
//!
//! # Ten users for sixty seconds, leaving created data in place
//! edfi-perf-test volume -b ... -k ... -s ... \
//!   --users 10 --duration 60 --delete-resources false
//! ```
//!
//! Every flag has a `PERF_*` environment variable equivalent; see
//! `edfi-perf-test <tool> --help`.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use edfi_perf_test::{config::OutputArgs, fatal, paging, pipeclean, query, volume};

#[derive(Parser)]
#[command(
    name = "edfi-perf-test",
    about = "Performance and load testing tools for the Ed-Fi ODS/API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure collection paging performance across resources
    Paging(paging::PagingArgs),
    /// Measure filtered query performance across resources
    Query(query::QueryArgs),
    /// Smoke-test the CRUD cycle of every catalog resource
    Pipeclean(pipeclean::PipecleanArgs),
    /// Sustained create/update/delete load from simulated users
    Volume(volume::VolumeArgs),
}

impl Commands {
    fn output(&self) -> &OutputArgs {
        match self {
            Commands::Paging(args) => &args.output,
            Commands::Query(args) => &args.output,
            Commands::Pipeclean(args) => &args.output,
            Commands::Volume(args) => &args.output,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level when both are set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.command.output().log_level.as_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    // Failures recorded mid-run fail the process even though the reports
    // were written.
    if fatal::take() {
        eprintln!("Test run completed with errors; see the log and the error counts in the summary report.");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Paging(args) => paging::run(args).await,
        Commands::Query(args) => query::run(args).await,
        Commands::Pipeclean(args) => pipeclean::run(args).await,
        Commands::Volume(args) => volume::run(args).await,
    }
}
