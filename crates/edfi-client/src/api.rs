//! The client trait the resolver and test runners are written against.

use crate::error::ClientError;
use async_trait::async_trait;
use serde_json::Value;

/// A successful POST: the API-assigned identifier from the `Location`
/// header and the status the server answered with. The ODS API returns
/// 201 for a new resource and 200 when the natural key matched an
/// existing one and the POST became an upsert.
#[derive(Debug, Clone)]
pub struct CreatedResource {
    pub id: String,
    pub status: u16,
}

/// Create/read/update/delete operations against Ed-Fi resource endpoints.
///
/// `endpoint` is always the bare resource name (`students`, `schools`);
/// URL construction is the implementation's concern. Implemented by
/// [`crate::RequestClient`] for real runs and by in-memory fakes in tests.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// POST a new resource.
    async fn create(&self, endpoint: &str, payload: &Value)
        -> Result<CreatedResource, ClientError>;

    /// GET the resource collection (first page, server default size).
    async fn get_list(&self, endpoint: &str) -> Result<Vec<Value>, ClientError>;

    /// GET a single resource by identifier.
    async fn get_item(&self, endpoint: &str, resource_id: &str) -> Result<Value, ClientError>;

    /// PUT a fully-specified resource. The ODS API rejects partial
    /// updates, so `payload` must carry every attribute. Returns the
    /// response status.
    async fn update(
        &self,
        endpoint: &str,
        resource_id: &str,
        payload: &Value,
    ) -> Result<u16, ClientError>;

    /// DELETE a resource by identifier. Returns the response status.
    async fn delete(&self, endpoint: &str, resource_id: &str) -> Result<u16, ClientError>;
}
