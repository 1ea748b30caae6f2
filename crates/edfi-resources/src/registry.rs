//! The descriptor registry.

use std::collections::BTreeMap;

use crate::catalog;
use crate::descriptor::ResourceDescriptor;
use crate::kind::ResourceKind;

/// Looks up [`ResourceDescriptor`]s by kind.
///
/// Construction validates the catalog: every dependency must name a
/// registered kind and the dependency graph must be acyclic. Both checks
/// panic because a broken catalog is a programming error, not a runtime
/// condition.
pub struct Registry {
    descriptors: BTreeMap<ResourceKind, ResourceDescriptor>,
}

impl Registry {
    /// Builds the registry from the built-in catalog.
    pub fn new() -> Self {
        Self::from_descriptors(catalog::descriptors())
    }

    fn from_descriptors(all: Vec<ResourceDescriptor>) -> Self {
        let mut descriptors = BTreeMap::new();
        for descriptor in all {
            let kind = descriptor.kind;
            if descriptors.insert(kind, descriptor).is_some() {
                panic!("duplicate descriptor for resource kind {kind}");
            }
        }
        let registry = Registry { descriptors };
        registry.validate();
        registry
    }

    pub fn get(&self, kind: ResourceKind) -> Option<&ResourceDescriptor> {
        self.descriptors.get(&kind)
    }

    /// All registered kinds in catalog order.
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.descriptors.keys().copied()
    }

    fn validate(&self) {
        for descriptor in self.descriptors.values() {
            let mut trail = Vec::new();
            self.walk(descriptor.kind, &mut trail);
        }
    }

    fn walk(&self, kind: ResourceKind, trail: &mut Vec<ResourceKind>) {
        if trail.contains(&kind) {
            panic!("dependency cycle through resource kind {kind}");
        }
        let descriptor = self
            .descriptors
            .get(&kind)
            .unwrap_or_else(|| panic!("dependency on unregistered resource kind {kind}"));
        trail.push(kind);
        for dependency in &descriptor.dependencies {
            self.walk(dependency.kind, trail);
        }
        trail.pop();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn built_in_catalog_is_complete_and_acyclic() {
        let registry = Registry::new();
        for kind in ResourceKind::all() {
            assert!(registry.get(*kind).is_some(), "missing descriptor for {kind}");
        }
    }

    #[test]
    fn templates_leave_bound_fields_null() {
        let registry = Registry::new();
        let mut rng = StdRng::seed_from_u64(42);
        for kind in registry.kinds() {
            let descriptor = registry.get(kind).unwrap();
            let payload = (descriptor.template)(&mut rng);
            for dependency in &descriptor.dependencies {
                for binding in dependency.bindings {
                    let target = crate::paths::get_path(&payload, binding.target);
                    assert_eq!(
                        target,
                        Some(&serde_json::Value::Null),
                        "{kind} template should leave {} unset",
                        binding.target
                    );
                }
            }
        }
    }

    #[test]
    fn read_only_kinds_have_no_dependencies() {
        let registry = Registry::new();
        let school_year = registry.get(ResourceKind::SchoolYearType).unwrap();
        assert!(school_year.read_only);
        assert!(school_year.dependencies.is_empty());
        assert!(school_year.update.is_none());
    }
}
