//! Resource catalog and dependency resolution for the Ed-Fi ODS/API.
//!
//! Creating most Ed-Fi resources requires a web of prerequisite resources
//! to exist first: a section needs a course offering, which needs a session,
//! which needs grading periods, and nearly everything hangs off a school.
//! This crate models those prerequisites declaratively. Each resource kind
//! has a [`ResourceDescriptor`] carrying a payload template, a list of
//! [`DependencySpec`]s, and the key-path bindings that copy identifying
//! fields from a created prerequisite into the dependent payload.
//!
//! The [`Resolver`] walks that graph depth-first, creating prerequisites
//! through an [`edfi_client::ApiClient`], memoizing designated shared
//! resources (the elementary and high school) in a [`SharedResources`]
//! cache so they are created at most once per run.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod factory;
pub mod kind;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod shared;

pub use descriptor::{Binding, DependencySpec, ResourceDescriptor, UpdateSpec};
pub use error::ResolveError;
pub use kind::{ResourceKind, SharedSlot};
pub use paths::{get_path, set_path};
pub use registry::Registry;
pub use resolver::{ResourceInstance, Resolver};
pub use shared::SharedResources;
