//! Shared CLI options and client construction.
//!
//! Every flag can also be supplied through a `PERF_*` environment
//! variable, so CI pipelines can configure runs without editing command
//! lines.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use edfi_client::{metadata, ClientCredentials, RequestClient};
use perf_report::{LogLevel, OutputFormat};

/// Connection options shared by every tool.
#[derive(Debug, Clone, Args)]
pub struct ApiArgs {
    /// Base URL of the ODS API, e.g. https://localhost/WebApi
    #[arg(short = 'b', long = "base-url", env = "PERF_API_BASEURL")]
    pub base_url: String,

    /// OAuth client key
    #[arg(short = 'k', long = "key", env = "PERF_API_KEY")]
    pub key: String,

    /// OAuth client secret
    #[arg(short = 's', long = "secret", env = "PERF_API_SECRET")]
    pub secret: String,

    /// Accept self-signed TLS certificates
    #[arg(
        short = 'i',
        long = "ignore-certificates",
        env = "PERF_IGNORE_CERTIFICATE_ERRORS",
        default_value_t = false
    )]
    pub ignore_certificates: bool,

    /// Maximum number of resources exercised concurrently
    #[arg(
        short = 'c',
        long = "connection-limit",
        env = "PERF_CONNECTION_LIMIT",
        default_value_t = 5
    )]
    pub connection_limit: usize,
}

impl ApiArgs {
    /// Builds an HTTP client and performs the initial login.
    pub async fn connect(&self) -> anyhow::Result<Arc<RequestClient>> {
        let client = RequestClient::new(
            ClientCredentials {
                base_url: self.base_url.clone(),
                key: self.key.clone(),
                secret: self.secret.clone(),
            },
            self.ignore_certificates,
        )
        .context("failed to build the HTTP client")?;
        client
            .login()
            .await
            .with_context(|| format!("login against {} failed", self.base_url))?;
        Ok(Arc::new(client))
    }
}

/// Output and run-shape options shared by every tool.
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Directory the report files are written to
    #[arg(
        short = 'o',
        long = "output",
        env = "PERF_OUTPUT_DIR",
        default_value = "out"
    )]
    pub output_dir: PathBuf,

    /// Report file format (csv or json, case-insensitive)
    #[arg(
        short = 't',
        long = "format",
        env = "PERF_CONTENT_TYPE",
        default_value_t = OutputFormat::Csv
    )]
    pub format: OutputFormat,

    /// Comma-separated resources to exercise; every discoverable resource
    /// when omitted
    #[arg(
        short = 'r',
        long = "resource-list",
        env = "PERF_RESOURCE_LIST",
        value_delimiter = ','
    )]
    pub resource_list: Vec<String>,

    /// Page size for collection reads
    #[arg(
        short = 'p',
        long = "page-size",
        env = "PERF_API_PAGE_SIZE",
        default_value_t = 100
    )]
    pub page_size: u64,

    /// Console log level (VERBOSE, DEBUG, INFO, WARN, ERROR, case-insensitive)
    #[arg(
        short = 'l',
        long = "log-level",
        env = "PERF_LOG_LEVEL",
        default_value_t = LogLevel::Info
    )]
    pub log_level: LogLevel,

    /// Free-form description recorded in the run metadata
    #[arg(
        short = 'd',
        long = "description",
        env = "PERF_DESCRIPTION",
        default_value = ""
    )]
    pub description: String,
}

impl OutputArgs {
    /// The resources this run covers: the explicit `--resource-list` when
    /// given, otherwise everything the API's OpenAPI metadata advertises.
    pub async fn resolve_resources(&self, client: &RequestClient) -> anyhow::Result<Vec<String>> {
        if !self.resource_list.is_empty() {
            return Ok(metadata::normalize_resource_paths(
                self.resource_list.clone(),
            ));
        }
        let discovered = metadata::resource_endpoints(client.http(), client.base_url())
            .await
            .context("resource discovery through the OpenAPI metadata failed")?;
        tracing::info!(count = discovered.len(), "discovered resources from API metadata");
        Ok(discovered)
    }
}
