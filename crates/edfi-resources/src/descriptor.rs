//! Declarative resource descriptors.

use rand::rngs::StdRng;
use serde_json::Value;

use crate::kind::{ResourceKind, SharedSlot};

/// Copies the value at `source` in a created prerequisite's payload to the
/// `target` key path in the dependent payload.
#[derive(Debug, Clone, Copy)]
pub struct Binding {
    pub source: &'static str,
    pub target: &'static str,
}

impl Binding {
    pub const fn new(source: &'static str, target: &'static str) -> Self {
        Binding { source, target }
    }
}

/// One prerequisite of a resource kind.
///
/// A dependency with a `shared` slot is created at most once per run and
/// reused; one without is created fresh for every dependent instance.
#[derive(Debug, Clone)]
pub struct DependencySpec {
    pub kind: ResourceKind,
    pub shared: Option<SharedSlot>,
    pub bindings: &'static [Binding],
}

impl DependencySpec {
    pub fn fresh(kind: ResourceKind, bindings: &'static [Binding]) -> Self {
        DependencySpec {
            kind,
            shared: None,
            bindings,
        }
    }

    pub fn shared(slot: SharedSlot, bindings: &'static [Binding]) -> Self {
        DependencySpec {
            kind: slot.kind(),
            shared: Some(slot),
            bindings,
        }
    }
}

/// The field a pipeclean run mutates before issuing its update request.
#[derive(Debug, Clone)]
pub struct UpdateSpec {
    pub path: &'static str,
    pub value: fn(&mut StdRng) -> Value,
}

/// Everything the resolver needs to know about one resource kind.
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    /// True for catalog kinds the ODS seeds itself; they are fetched but
    /// never created, updated, or deleted.
    pub read_only: bool,
    /// Produces a fresh payload with randomized identity attributes.
    /// Read-only kinds use an empty template.
    pub template: fn(&mut StdRng) -> Value,
    pub dependencies: Vec<DependencySpec>,
    pub update: Option<UpdateSpec>,
}

impl ResourceDescriptor {
    pub fn endpoint(&self) -> &'static str {
        self.kind.endpoint()
    }
}
