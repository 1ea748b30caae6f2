//! Depth-first resource creation over the dependency graph.

use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

use edfi_client::ApiClient;

use crate::error::ResolveError;
use crate::factory::build_descriptor_dicts;
use crate::kind::{ResourceKind, SharedSlot};
use crate::paths::{get_path, set_path};
use crate::registry::Registry;
use crate::shared::SharedResources;

/// A resource created through the API, with enough context to update and
/// delete it later.
#[derive(Debug, Clone)]
pub struct ResourceInstance {
    pub kind: ResourceKind,
    /// Identifier assigned by the API on creation.
    pub id: String,
    /// Status the server answered the POST with (201, or 200 when the
    /// natural key matched and the POST became an upsert).
    pub status: u16,
    /// The payload as it was sent, references already bound.
    pub attributes: Value,
    /// Fresh prerequisites created for this instance, in creation order.
    /// Shared prerequisites are not listed; they outlive the instance.
    pub prerequisites: Vec<ResourceInstance>,
}

/// Creates resources and their prerequisite graphs through an [`ApiClient`].
///
/// Payload construction layers three sources, later ones winning: the
/// kind's template, reference bindings copied from created prerequisites,
/// and caller overrides.
pub struct Resolver {
    client: Arc<dyn ApiClient>,
    registry: Arc<Registry>,
    shared: SharedResources,
    rng: Mutex<StdRng>,
}

impl Resolver {
    pub fn new(client: Arc<dyn ApiClient>, registry: Arc<Registry>) -> Self {
        Self::with_seed(client, registry, rand::random())
    }

    /// A resolver with a fixed template seed, for reproducible payloads.
    pub fn with_seed(client: Arc<dyn ApiClient>, registry: Arc<Registry>, seed: u64) -> Self {
        Resolver {
            client,
            registry,
            shared: SharedResources::new(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn shared(&self) -> &SharedResources {
        &self.shared
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Creates an instance of `kind`, creating every prerequisite first.
    /// `overrides` are key paths applied after reference binding, so a
    /// caller-supplied value always wins.
    pub async fn create_with_dependencies(
        &self,
        kind: ResourceKind,
        overrides: &[(&str, Value)],
    ) -> Result<ResourceInstance, ResolveError> {
        let owned: Vec<(String, Value)> = overrides
            .iter()
            .map(|(path, value)| (path.to_string(), value.clone()))
            .collect();
        self.create_boxed(kind, owned).await
    }

    fn create_boxed(
        &self,
        kind: ResourceKind,
        overrides: Vec<(String, Value)>,
    ) -> BoxFuture<'_, Result<ResourceInstance, ResolveError>> {
        Box::pin(async move {
            let descriptor = self
                .registry
                .get(kind)
                .ok_or(ResolveError::UnknownKind(kind))?;
            if descriptor.read_only {
                return Err(ResolveError::ReadOnly(kind));
            }

            let mut payload = {
                let mut rng = self.rng.lock().expect("template rng mutex poisoned");
                (descriptor.template)(&mut rng)
            };

            let mut prerequisites = Vec::new();
            for dependency in &descriptor.dependencies {
                let instance = match dependency.shared {
                    Some(slot) => {
                        self.shared
                            .get_or_create(slot, || {
                                self.create_boxed(slot.kind(), slot_overrides(slot))
                            })
                            .await?
                    }
                    None => {
                        let instance = self.create_boxed(dependency.kind, Vec::new()).await?;
                        prerequisites.push(instance.clone());
                        instance
                    }
                };
                if instance.id.is_empty() {
                    return Err(ResolveError::MissingIdentifier {
                        kind: dependency.kind,
                    });
                }
                for binding in dependency.bindings {
                    let value = get_path(&instance.attributes, binding.source)
                        .ok_or_else(|| ResolveError::MissingReferenceField {
                            kind: dependency.kind,
                            path: binding.source.to_string(),
                        })?
                        .clone();
                    set_path(&mut payload, binding.target, value)?;
                }
            }

            for (path, value) in &overrides {
                set_path(&mut payload, path, value.clone())?;
            }

            let created = self
                .client
                .create(descriptor.endpoint(), &payload)
                .await
                .map_err(|source| ResolveError::Creation { kind, source })?;
            tracing::debug!(resource = %kind, id = created.id, "created resource");

            Ok(ResourceInstance {
                kind,
                id: created.id,
                status: created.status,
                attributes: payload,
                prerequisites,
            })
        })
    }

    /// Applies the kind's update attribute to the instance and PUTs the
    /// full payload. Returns the PUT status, or `None` when the kind has
    /// no update attribute and nothing was sent.
    pub async fn update(
        &self,
        instance: &mut ResourceInstance,
    ) -> Result<Option<u16>, ResolveError> {
        let descriptor = self
            .registry
            .get(instance.kind)
            .ok_or(ResolveError::UnknownKind(instance.kind))?;
        let Some(update) = &descriptor.update else {
            return Ok(None);
        };
        let value = {
            let mut rng = self.rng.lock().expect("template rng mutex poisoned");
            (update.value)(&mut rng)
        };
        set_path(&mut instance.attributes, update.path, value)?;
        let status = self
            .client
            .update(descriptor.endpoint(), &instance.id, &instance.attributes)
            .await
            .map_err(|source| ResolveError::Update {
                kind: instance.kind,
                source,
            })?;
        Ok(Some(status))
    }

    /// Deletes the instance and then its fresh prerequisites, newest
    /// first. Shared resources are left in place. Returns the status of
    /// the instance's own DELETE.
    pub fn delete_with_dependencies<'a>(
        &'a self,
        instance: &'a ResourceInstance,
    ) -> BoxFuture<'a, Result<u16, ResolveError>> {
        Box::pin(async move {
            let status = self
                .client
                .delete(instance.kind.endpoint(), &instance.id)
                .await
                .map_err(|source| ResolveError::Deletion {
                    kind: instance.kind,
                    source,
                })?;
            tracing::debug!(resource = %instance.kind, id = instance.id, "deleted resource");
            for prerequisite in instance.prerequisites.iter().rev() {
                self.delete_with_dependencies(prerequisite).await?;
            }
            Ok(status)
        })
    }
}

/// Slot-specific template adjustments. The elementary school swaps the
/// default high-school grade levels for elementary ones.
fn slot_overrides(slot: SharedSlot) -> Vec<(String, Value)> {
    match slot {
        SharedSlot::HighSchool => vec![],
        SharedSlot::ElementarySchool => vec![
            (
                "nameOfInstitution".to_string(),
                json!("Grand Bend Elementary School"),
            ),
            (
                "gradeLevels".to_string(),
                build_descriptor_dicts(
                    "GradeLevel",
                    "gradeLevelDescriptor",
                    &[
                        "Kindergarten",
                        "First grade",
                        "Second grade",
                        "Third grade",
                        "Fourth grade",
                        "Fifth grade",
                    ],
                ),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use edfi_client::{ClientError, CreatedResource};
    use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};

    struct FakeApi {
        next_id: AtomicUsize,
        post_status: AtomicU16,
        created: Mutex<Vec<(String, Value)>>,
        updated: Mutex<Vec<(String, String, Value)>>,
        deleted: Mutex<Vec<(String, String)>>,
    }

    impl Default for FakeApi {
        fn default() -> Self {
            FakeApi {
                next_id: AtomicUsize::new(0),
                post_status: AtomicU16::new(201),
                created: Mutex::new(Vec::new()),
                updated: Mutex::new(Vec::new()),
                deleted: Mutex::new(Vec::new()),
            }
        }
    }

    impl FakeApi {
        fn created(&self) -> Vec<(String, Value)> {
            self.created.lock().unwrap().clone()
        }

        fn deleted(&self) -> Vec<(String, String)> {
            self.deleted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ApiClient for FakeApi {
        async fn create(
            &self,
            endpoint: &str,
            payload: &Value,
        ) -> Result<CreatedResource, ClientError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.created
                .lock()
                .unwrap()
                .push((endpoint.to_string(), payload.clone()));
            Ok(CreatedResource {
                id: format!("id-{id}"),
                status: self.post_status.load(Ordering::SeqCst),
            })
        }

        async fn get_list(&self, _endpoint: &str) -> Result<Vec<Value>, ClientError> {
            Ok(vec![])
        }

        async fn get_item(&self, _endpoint: &str, _id: &str) -> Result<Value, ClientError> {
            Ok(json!({}))
        }

        async fn update(
            &self,
            endpoint: &str,
            resource_id: &str,
            payload: &Value,
        ) -> Result<u16, ClientError> {
            self.updated.lock().unwrap().push((
                endpoint.to_string(),
                resource_id.to_string(),
                payload.clone(),
            ));
            Ok(204)
        }

        async fn delete(&self, endpoint: &str, resource_id: &str) -> Result<u16, ClientError> {
            self.deleted
                .lock()
                .unwrap()
                .push((endpoint.to_string(), resource_id.to_string()));
            Ok(204)
        }
    }

    fn resolver_with(api: &Arc<FakeApi>) -> Resolver {
        Resolver::with_seed(api.clone() as Arc<dyn ApiClient>, Arc::new(Registry::new()), 1)
    }

    #[tokio::test]
    async fn school_creation_needs_no_prerequisites() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);
        let school = resolver
            .create_with_dependencies(ResourceKind::School, &[])
            .await
            .unwrap();
        assert_eq!(school.id, "id-0");
        assert!(school.prerequisites.is_empty());
        assert_eq!(api.created().len(), 1);
        assert!(get_path(&school.attributes, "schoolId").unwrap().is_i64());
    }

    #[tokio::test]
    async fn class_period_reuses_the_shared_school() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);

        let first = resolver
            .create_with_dependencies(ResourceKind::ClassPeriod, &[])
            .await
            .unwrap();
        let second = resolver
            .create_with_dependencies(ResourceKind::ClassPeriod, &[])
            .await
            .unwrap();

        // One school plus two class periods.
        let created = api.created();
        assert_eq!(created.len(), 3);
        assert_eq!(created[0].0, "schools");
        let school_id = get_path(&created[0].1, "schoolId").unwrap().clone();
        assert_eq!(
            get_path(&first.attributes, "schoolReference.schoolId"),
            Some(&school_id)
        );
        assert_eq!(
            get_path(&second.attributes, "schoolReference.schoolId"),
            Some(&school_id)
        );
        assert!(first.prerequisites.is_empty());
    }

    #[tokio::test]
    async fn section_references_match_created_prerequisites() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);

        let section = resolver
            .create_with_dependencies(ResourceKind::Section, &[])
            .await
            .unwrap();

        let class_period = section
            .prerequisites
            .iter()
            .find(|p| p.kind == ResourceKind::ClassPeriod)
            .unwrap();
        assert_eq!(
            get_path(&section.attributes, "classPeriods.0.classPeriodReference.classPeriodName"),
            get_path(&class_period.attributes, "classPeriodName")
        );

        let offering = section
            .prerequisites
            .iter()
            .find(|p| p.kind == ResourceKind::CourseOffering)
            .unwrap();
        assert_eq!(
            get_path(&section.attributes, "courseOfferingReference.localCourseCode"),
            get_path(&offering.attributes, "localCourseCode")
        );
        assert_eq!(
            get_path(&section.attributes, "courseOfferingReference.sessionName"),
            get_path(&offering.attributes, "sessionReference.sessionName")
        );

        // Every reference points at the one shared school.
        let school_id =
            get_path(&class_period.attributes, "schoolReference.schoolId").unwrap();
        assert_eq!(
            get_path(&section.attributes, "courseOfferingReference.schoolId"),
            Some(school_id)
        );
        assert_eq!(
            get_path(&section.attributes, "locationReference.schoolId"),
            Some(school_id)
        );
        assert_eq!(api.created().iter().filter(|(e, _)| e == "schools").count(), 1);
    }

    #[tokio::test]
    async fn overrides_win_over_bindings_and_template() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);
        let class_period = resolver
            .create_with_dependencies(
                ResourceKind::ClassPeriod,
                &[
                    ("classPeriodName", json!("First Period Override")),
                    ("schoolReference.schoolId", json!(997)),
                ],
            )
            .await
            .unwrap();
        assert_eq!(
            get_path(&class_period.attributes, "classPeriodName"),
            Some(&json!("First Period Override"))
        );
        assert_eq!(
            get_path(&class_period.attributes, "schoolReference.schoolId"),
            Some(&json!(997))
        );
    }

    #[tokio::test]
    async fn read_only_kind_cannot_be_created() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);
        let result = resolver
            .create_with_dependencies(ResourceKind::SchoolYearType, &[])
            .await;
        assert!(matches!(result, Err(ResolveError::ReadOnly(_))));
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn staff_creation_needs_no_prerequisites() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);
        let staff = resolver
            .create_with_dependencies(ResourceKind::Staff, &[])
            .await
            .unwrap();
        assert!(staff.prerequisites.is_empty());
        assert_eq!(api.created().len(), 1);
        assert_eq!(api.created()[0].0, "staffs");
        // The state identification code repeats the unique id.
        assert_eq!(
            get_path(&staff.attributes, "identificationCodes.0.identificationCode"),
            get_path(&staff.attributes, "staffUniqueId")
        );
    }

    #[tokio::test]
    async fn instance_status_echoes_the_server_response() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);
        let created = resolver
            .create_with_dependencies(ResourceKind::Student, &[])
            .await
            .unwrap();
        assert_eq!(created.status, 201);

        // Natural-key match turns the POST into a 200 upsert.
        api.post_status.store(200, Ordering::SeqCst);
        let upserted = resolver
            .create_with_dependencies(ResourceKind::Student, &[])
            .await
            .unwrap();
        assert_eq!(upserted.status, 200);

        let deleted = resolver.delete_with_dependencies(&created).await.unwrap();
        assert_eq!(deleted, 204);
    }

    #[tokio::test]
    async fn update_applies_the_kind_update_attribute() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);
        let mut student = resolver
            .create_with_dependencies(ResourceKind::Student, &[])
            .await
            .unwrap();
        let updated = resolver.update(&mut student).await.unwrap();
        assert_eq!(updated, Some(204));
        assert_eq!(
            get_path(&student.attributes, "firstName"),
            Some(&json!("Madison"))
        );
        let puts = api.updated.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "students");
        assert_eq!(puts[0].1, student.id);
    }

    #[tokio::test]
    async fn delete_removes_instance_then_fresh_prerequisites_only() {
        let api = Arc::new(FakeApi::default());
        let resolver = resolver_with(&api);
        let association = resolver
            .create_with_dependencies(ResourceKind::StudentSchoolAssociation, &[])
            .await
            .unwrap();

        resolver.delete_with_dependencies(&association).await.unwrap();

        let deleted = api.deleted();
        assert_eq!(deleted[0].0, "studentSchoolAssociations");
        assert!(deleted.iter().any(|(e, _)| e == "students"));
        // The shared school survives the teardown.
        assert!(!deleted.iter().any(|(e, _)| e == "schools"));
    }
}
