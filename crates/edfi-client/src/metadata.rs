//! Resource discovery through the API's OpenAPI metadata.
//!
//! When the operator does not name resources explicitly, the tools walk
//! the metadata chain the ODS API publishes: the API root lists metadata
//! URLs, the OpenAPI metadata lists sections, and the `Resources` section
//! is a swagger document whose paths are the resource endpoints.

use crate::error::ClientError;
use serde_json::Value;

/// Discover every resource endpoint the API exposes.
///
/// Returns relative paths including any extension prefix, for example
/// `["schools", "tpdm/candidates"]`. Results should be fetched once per
/// run; nothing here is cached.
pub async fn resource_endpoints(
    http: &reqwest::Client,
    base_url: &str,
) -> Result<Vec<String>, ClientError> {
    let base_url = base_url.trim_end_matches('/');
    tracing::debug!("Getting metadata from the API root");
    let root: Value = fetch_json(http, base_url).await?;

    let openapi_url = root
        .pointer("/urls/openApiMetadata")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ClientError::InvalidBody {
            url: base_url.to_string(),
            message: "API root carries no urls.openApiMetadata".to_string(),
        })?;

    tracing::debug!("Getting OpenAPI metadata from {openapi_url}");
    let sections: Vec<Value> = serde_json::from_value(fetch_json(http, openapi_url).await?)
        .map_err(|e| ClientError::InvalidBody {
            url: openapi_url.to_string(),
            message: e.to_string(),
        })?;

    let resources_url = sections
        .iter()
        .find(|s| s.get("name").and_then(|n| n.as_str()) == Some("Resources"))
        .and_then(|s| s.get("endpointUri").and_then(|u| u.as_str()))
        .ok_or_else(|| ClientError::InvalidBody {
            url: openapi_url.to_string(),
            message: "no Resources section in OpenAPI metadata".to_string(),
        })?;

    let swagger: Value = fetch_json(http, resources_url).await?;
    let paths = swagger
        .get("paths")
        .and_then(|p| p.as_object())
        .ok_or_else(|| ClientError::InvalidBody {
            url: resources_url.to_string(),
            message: "resource metadata carries no paths".to_string(),
        })?;

    // Collection endpoints only: drop by-id and deletes variants.
    let endpoints = paths
        .keys()
        .filter(|p| !p.contains("{id}") && !p.contains("/deletes"))
        .cloned()
        .collect();
    Ok(normalize_resource_paths(endpoints))
}

/// Normalize relative resource paths: strip the leading slash and the
/// `ed-fi/` namespace prefix, lowercase the rest. Extension prefixes
/// (e.g. `tpdm/`) are kept.
pub fn normalize_resource_paths(paths: Vec<String>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| {
            p.trim_start_matches('/')
                .trim_start_matches("ed-fi/")
                .to_ascii_lowercase()
        })
        .collect()
}

async fn fetch_json(http: &reqwest::Client, url: &str) -> Result<Value, ClientError> {
    let response = http.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::UnexpectedStatus {
            method: "GET",
            url: url.to_string(),
            status: status.as_u16(),
            message: "metadata fetch failed".to_string(),
        });
    }
    response.json().await.map_err(ClientError::Transport)
}
