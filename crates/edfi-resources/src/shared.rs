//! Run-scoped shared resource cache.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::ResolveError;
use crate::kind::SharedSlot;
use crate::resolver::ResourceInstance;

/// Memoizes resources that should exist at most once per run.
///
/// The cache holds its lock across the creating future, so concurrent
/// callers racing for an empty slot serialize and all but the first get the
/// memoized instance. Slot creation must not request another slot, or the
/// second acquisition would deadlock; the built-in catalog's slots are
/// schools with no shared prerequisites.
#[derive(Clone, Default)]
pub struct SharedResources {
    slots: Arc<Mutex<HashMap<&'static str, ResourceInstance>>>,
}

impl SharedResources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the instance in `slot`, creating it with `create` on first
    /// use. A failed creation leaves the slot empty for the next caller.
    pub async fn get_or_create<F, Fut>(
        &self,
        slot: SharedSlot,
        create: F,
    ) -> Result<ResourceInstance, ResolveError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResourceInstance, ResolveError>>,
    {
        let mut slots = self.slots.lock().await;
        if let Some(existing) = slots.get(slot.name()) {
            return Ok(existing.clone());
        }
        let instance = create().await?;
        slots.insert(slot.name(), instance.clone());
        Ok(instance)
    }

    /// Number of populated slots.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.lock().await.is_empty()
    }
}
