//! The production `reqwest`-backed API client.

use crate::api::{ApiClient, CreatedResource};
use crate::error::ClientError;
use crate::paginated::PageResult;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;
use tokio::sync::RwLock;

/// Resource endpoints live under this prefix on every ODS API host.
pub const API_PREFIX: &str = "/data/v3/ed-fi";

/// OAuth2 token endpoint, relative to the base URL.
pub const OAUTH_TOKEN_PATH: &str = "/oauth/token";

/// OAuth client credentials plus the API base URL.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub base_url: String,
    pub key: String,
    pub secret: String,
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authenticated client for one Ed-Fi ODS/API host.
///
/// Logs in lazily on the first request and re-logs-in once when a request
/// comes back 401 (token expiry during a long run). Request timeouts and
/// connection pooling are configured on the underlying `reqwest` client;
/// callers own concurrency limits.
pub struct RequestClient {
    credentials: ClientCredentials,
    http: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl RequestClient {
    pub fn new(
        credentials: ClientCredentials,
        ignore_certificates: bool,
    ) -> Result<Self, ClientError> {
        // Self-signed certificates are the norm in Ed-Fi test lab
        // environments, hence the opt-in escape hatch.
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(ignore_certificates)
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        Ok(Self {
            credentials,
            http,
            token: RwLock::new(None),
        })
    }

    /// The underlying HTTP client, for unauthenticated metadata requests.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &str {
        self.credentials.base_url.trim_end_matches('/')
    }

    /// Absolute URL for a resource endpoint, e.g.
    /// `http://host/data/v3/ed-fi/students`.
    pub fn resource_url(&self, endpoint: &str) -> String {
        format!("{}{}/{}", self.base_url(), API_PREFIX, endpoint)
    }

    /// Fetch a fresh bearer token with the client-credentials grant.
    pub async fn login(&self) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url(), OAUTH_TOKEN_PATH);
        tracing::debug!("Logging in at {url}");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.credentials.key.as_str()),
                ("client_secret", self.credentials.secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Login(format!(
                "token endpoint returned {status}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Login(format!("unparseable token response: {e}")))?;
        *self.token.write().await = Some(token.access_token);
        Ok(())
    }

    async fn bearer_token(&self) -> Result<String, ClientError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }
        self.login().await?;
        Ok(self
            .token
            .read()
            .await
            .clone()
            .expect("token populated by login"))
    }

    /// Issue an authenticated request, refreshing the token once on 401.
    async fn send(
        &self,
        method: reqwest::Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut attempted_refresh = false;
        loop {
            let token = self.bearer_token().await?;
            let mut request = self
                .http
                .request(method.clone(), url)
                .bearer_auth(&token)
                .header("Accept", "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            if response.status() == reqwest::StatusCode::UNAUTHORIZED && !attempted_refresh {
                tracing::debug!("Token rejected at {url}, refreshing once");
                attempted_refresh = true;
                self.login().await?;
                continue;
            }
            return Ok(response);
        }
    }

    /// GET one page of a resource collection, timing the whole request
    /// including body read. Non-success statuses are returned inside the
    /// `PageResult` (with no records) rather than as errors, so the sweep
    /// driver can record them; only transport failures are `Err`.
    pub async fn get_page(
        &self,
        resource: &str,
        page: u64,
        page_size: u64,
    ) -> Result<PageResult, ClientError> {
        let offset = (page - 1) * page_size;
        let url = format!(
            "{}?offset={offset}&limit={page_size}",
            self.resource_url(resource)
        );
        self.timed_collection_get(resource, &url, page, page_size)
            .await
    }

    /// GET a resource collection filtered by query parameters.
    pub async fn query(
        &self,
        resource: &str,
        params: &[(String, String)],
    ) -> Result<PageResult, ClientError> {
        let query: Vec<String> = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        let url = format!("{}?{}", self.resource_url(resource), query.join("&"));
        self.timed_collection_get(resource, &url, 1, 0).await
    }

    /// Total record count for a resource, from the `total-count` header.
    pub async fn get_total(&self, resource: &str) -> Result<u64, ClientError> {
        let url = format!(
            "{}?offset=0&limit=0&totalCount=true",
            self.resource_url(resource)
        );
        let response = self.send(reqwest::Method::GET, &url, None).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(self.unexpected("GET", &url, status.as_u16(), String::new()));
        }

        response
            .headers()
            .get("total-count")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| ClientError::InvalidBody {
                url,
                message: "missing or unparseable total-count header".to_string(),
            })
    }

    async fn timed_collection_get(
        &self,
        resource: &str,
        url: &str,
        page: u64,
        page_size: u64,
    ) -> Result<PageResult, ClientError> {
        let start = Instant::now();
        let response = self.send(reqwest::Method::GET, url, None).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        let elapsed = start.elapsed().as_secs_f64();

        let records = if (200..300).contains(&status) {
            serde_json::from_str::<Vec<Value>>(&body).map_err(|e| ClientError::InvalidBody {
                url: url.to_string(),
                message: e.to_string(),
            })?
        } else {
            Vec::new()
        };

        Ok(PageResult {
            resource: resource.to_string(),
            url: url.to_string(),
            page,
            page_size,
            records,
            status,
            elapsed,
        })
    }

    fn unexpected(
        &self,
        method: &'static str,
        url: &str,
        status: u16,
        body: String,
    ) -> ClientError {
        // Prefer the API's own message field when the body carries one.
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);
        ClientError::UnexpectedStatus {
            method,
            url: url.to_string(),
            status,
            message,
        }
    }

    async fn expect_status(
        &self,
        method: &'static str,
        url: &str,
        response: reqwest::Response,
        accepted: &[u16],
    ) -> Result<(reqwest::StatusCode, reqwest::header::HeaderMap, String), ClientError> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        if !accepted.contains(&status.as_u16()) {
            return Err(self.unexpected(method, url, status.as_u16(), body));
        }
        Ok((status, headers, body))
    }
}

/// Last path segment of a `Location` header, which is where the ODS API
/// puts the identifier of a created or updated resource.
fn id_from_location(headers: &reqwest::header::HeaderMap, url: &str) -> Result<String, ClientError> {
    headers
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|loc| loc.rsplit('/').next())
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ClientError::MissingLocation {
            url: url.to_string(),
        })
}

#[async_trait]
impl ApiClient for RequestClient {
    async fn create(
        &self,
        endpoint: &str,
        payload: &Value,
    ) -> Result<CreatedResource, ClientError> {
        let url = self.resource_url(endpoint);
        let response = self.send(reqwest::Method::POST, &url, Some(payload)).await?;
        let (status, headers, _) = self
            .expect_status("POST", &url, response, &[200, 201])
            .await?;
        Ok(CreatedResource {
            id: id_from_location(&headers, &url)?,
            status: status.as_u16(),
        })
    }

    async fn get_list(&self, endpoint: &str) -> Result<Vec<Value>, ClientError> {
        let url = self.resource_url(endpoint);
        let response = self.send(reqwest::Method::GET, &url, None).await?;
        let (_, _, body) = self.expect_status("GET", &url, response, &[200]).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::InvalidBody {
            url,
            message: e.to_string(),
        })
    }

    async fn get_item(&self, endpoint: &str, resource_id: &str) -> Result<Value, ClientError> {
        let url = format!("{}/{resource_id}", self.resource_url(endpoint));
        let response = self.send(reqwest::Method::GET, &url, None).await?;
        let (_, _, body) = self.expect_status("GET", &url, response, &[200]).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::InvalidBody {
            url,
            message: e.to_string(),
        })
    }

    async fn update(
        &self,
        endpoint: &str,
        resource_id: &str,
        payload: &Value,
    ) -> Result<u16, ClientError> {
        let url = format!("{}/{resource_id}", self.resource_url(endpoint));
        let response = self.send(reqwest::Method::PUT, &url, Some(payload)).await?;
        let (status, _, _) = self
            .expect_status("PUT", &url, response, &[200, 204])
            .await?;
        Ok(status.as_u16())
    }

    async fn delete(&self, endpoint: &str, resource_id: &str) -> Result<u16, ClientError> {
        let url = format!("{}/{resource_id}", self.resource_url(endpoint));
        let response = self.send(reqwest::Method::DELETE, &url, None).await?;
        let (status, _, _) = self.expect_status("DELETE", &url, response, &[204]).await?;
        Ok(status.as_u16())
    }
}
