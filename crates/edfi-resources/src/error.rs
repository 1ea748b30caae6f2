//! Dependency resolution errors.

use edfi_client::ClientError;

use crate::kind::ResourceKind;

/// Everything that can go wrong while resolving a resource and its
/// prerequisite graph. Each variant names the kind at which resolution
/// failed so the caller can attribute the failure in its report.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no descriptor registered for resource kind {0}")]
    UnknownKind(ResourceKind),

    #[error("resource kind {0} is read-only and cannot be created")]
    ReadOnly(ResourceKind),

    #[error("failed to create {kind}")]
    Creation {
        kind: ResourceKind,
        #[source]
        source: ClientError,
    },

    #[error("failed to update {kind}")]
    Update {
        kind: ResourceKind,
        #[source]
        source: ClientError,
    },

    #[error("failed to delete {kind}")]
    Deletion {
        kind: ResourceKind,
        #[source]
        source: ClientError,
    },

    #[error("prerequisite {kind} was created without a usable identifier")]
    MissingIdentifier { kind: ResourceKind },

    #[error("prerequisite {kind} has no value at key path {path}")]
    MissingReferenceField { kind: ResourceKind, path: String },

    #[error("key path {path} cannot traverse segment {segment}")]
    InvalidPath { path: String, segment: String },
}
