//! Authenticated HTTP client for the Ed-Fi ODS/API.
//!
//! Wraps a `reqwest` client with the OAuth2 client-credentials handshake
//! the ODS API expects, resource URL construction under `/data/v3/ed-fi`,
//! and per-request wall-clock timing used by the measurement pipeline.
//!
//! The [`ApiClient`] trait is the seam between the tools and the network:
//! the resource dependency resolver and the pipeclean runner are written
//! against the trait so tests can substitute an in-memory fake, while
//! [`RequestClient`] is the production implementation.

pub mod api;
pub mod client;
pub mod error;
pub mod metadata;
pub mod paginated;

pub use api::{ApiClient, CreatedResource};
pub use client::{ClientCredentials, RequestClient, API_PREFIX, OAUTH_TOKEN_PATH};
pub use error::ClientError;
pub use metadata::normalize_resource_paths;
pub use paginated::PageResult;
