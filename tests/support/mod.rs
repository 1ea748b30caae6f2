//! In-memory mock of the ODS API surface the tools exercise.
//!
//! Serves the OAuth token endpoint and the `/data/v3/ed-fi` resource
//! routes over a real socket, so tests drive the tools end to end through
//! actual HTTP. Collections can be seeded with records and configured to
//! fail past a given offset.

// Each test binary uses a different slice of this module.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Clone, Default)]
pub struct MockOds {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    items: Mutex<HashMap<String, Value>>,
    fail_from_offset: Mutex<HashMap<String, usize>>,
    upsert_resources: Mutex<Vec<String>>,
    next_id: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl MockOds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a collection with `count` records shaped by `make`.
    pub fn seed_with<F: Fn(usize) -> Value>(&self, resource: &str, count: usize, make: F) {
        let records = (0..count).map(make).collect();
        self.inner
            .collections
            .lock()
            .unwrap()
            .insert(resource.to_string(), records);
    }

    /// Makes collection reads of `resource` return 500 once their offset
    /// reaches `offset`.
    pub fn fail_from_offset(&self, resource: &str, offset: usize) {
        self.inner
            .fail_from_offset
            .lock()
            .unwrap()
            .insert(resource.to_string(), offset);
    }

    /// Makes POSTs to `resource` answer 200 instead of 201, the way the
    /// ODS API does when the natural key matches an existing record.
    pub fn upsert_on_create(&self, resource: &str) {
        self.inner
            .upsert_resources
            .lock()
            .unwrap()
            .push(resource.to_string());
    }

    /// Every request seen, as `METHOD path?sorted-query` lines.
    pub fn requests(&self) -> Vec<String> {
        self.inner.requests.lock().unwrap().clone()
    }

    /// The resources POSTed to, in order.
    pub fn post_order(&self) -> Vec<String> {
        self.requests()
            .iter()
            .filter_map(|line| line.strip_prefix("POST ").map(|r| r.to_string()))
            .collect()
    }

    fn log(&self, line: String) {
        self.inner.requests.lock().unwrap().push(line);
    }

    /// Binds an ephemeral port and serves the mock until the test ends.
    /// Returns the base URL.
    pub async fn start(&self) -> String {
        let app = Router::new()
            .route("/oauth/token", post(token))
            .route("/data/v3/ed-fi/:resource", get(list).post(create))
            .route(
                "/data/v3/ed-fi/:resource/:id",
                get(item).put(update).delete(remove),
            )
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock");
        });
        format!("http://{addr}")
    }
}

fn sorted_query(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
    pairs.sort();
    pairs.join("&")
}

async fn token() -> Json<Value> {
    Json(json!({
        "access_token": "mock-token",
        "expires_in": 1800,
        "token_type": "bearer",
    }))
}

async fn list(
    State(mock): State<MockOds>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    mock.log(format!("GET {resource}?{}", sorted_query(&params)));

    let offset: usize = params
        .get("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let limit: usize = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(25);

    if let Some(fail_from) = mock.inner.fail_from_offset.lock().unwrap().get(&resource) {
        if offset >= *fail_from {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }

    let records = mock
        .inner
        .collections
        .lock()
        .unwrap()
        .get(&resource)
        .cloned()
        .unwrap_or_default();
    let matched: Vec<Value> = records
        .into_iter()
        .filter(|record| {
            params
                .iter()
                .filter(|(name, _)| !matches!(name.as_str(), "offset" | "limit" | "totalCount"))
                .all(|(name, value)| match record.get(name) {
                    Some(Value::String(field)) => field == value,
                    Some(other) => other.to_string() == *value,
                    None => false,
                })
        })
        .collect();

    let mut headers = HeaderMap::new();
    if params.get("totalCount").map(String::as_str) == Some("true") {
        headers.insert("total-count", matched.len().to_string().parse().unwrap());
    }
    let page: Vec<Value> = matched.into_iter().skip(offset).take(limit).collect();
    (StatusCode::OK, headers, Json(Value::Array(page))).into_response()
}

async fn create(
    State(mock): State<MockOds>,
    Path(resource): Path<String>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    mock.log(format!("POST {resource}"));
    let id = format!("id-{}", mock.inner.next_id.fetch_add(1, Ordering::SeqCst));
    mock.inner.items.lock().unwrap().insert(id.clone(), payload);
    let mut headers = HeaderMap::new();
    headers.insert(
        "location",
        format!("/data/v3/ed-fi/{resource}/{id}").parse().unwrap(),
    );
    let status = if mock.inner.upsert_resources.lock().unwrap().contains(&resource) {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (status, headers)
}

async fn item(
    State(mock): State<MockOds>,
    Path((resource, id)): Path<(String, String)>,
) -> impl IntoResponse {
    mock.log(format!("GET {resource}/{id}"));
    match mock.inner.items.lock().unwrap().get(&id) {
        Some(payload) => (StatusCode::OK, Json(payload.clone())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn update(
    State(mock): State<MockOds>,
    Path((resource, id)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    mock.log(format!("PUT {resource}/{id}"));
    match mock.inner.items.lock().unwrap().get_mut(&id) {
        Some(existing) => {
            *existing = payload;
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn remove(
    State(mock): State<MockOds>,
    Path((resource, id)): Path<(String, String)>,
) -> impl IntoResponse {
    mock.log(format!("DELETE {resource}/{id}"));
    match mock.inner.items.lock().unwrap().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}
