//! InMemoryDirectory: concurrent resource directory with synchronous notifications.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use meterbind_core::traits::{DirectoryEvent, EventFilter, EventListener};
use meterbind_core::{
    AttributeValue, DirectoryError, ResourceDirectory, ResourceName, ResourcePattern,
    SubscriptionId,
};

use crate::attributes::Resource;

struct Subscriber {
    filter: EventFilter,
    listener: EventListener,
}

/// Resource directory living entirely in process memory.
///
/// Notifications are delivered on the thread that registered or
/// unregistered the resource, after every internal guard is released.
/// A listener that panics is logged and does not stop delivery to the rest.
pub struct InMemoryDirectory {
    resources: DashMap<ResourceName, Arc<dyn Resource>>,
    subscribers: DashMap<SubscriptionId, Subscriber>,
    next_subscription: AtomicU64,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            resources: DashMap::new(),
            subscribers: DashMap::new(),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Register `resource` under `name` and notify matching listeners.
    pub fn register<R>(&self, name: ResourceName, resource: Arc<R>) -> Result<(), DirectoryError>
    where
        R: Resource + 'static,
    {
        let resource: Arc<dyn Resource> = resource;
        match self.resources.entry(name.clone()) {
            Entry::Occupied(_) => {
                return Err(DirectoryError::InstanceAlreadyExists {
                    name: name.to_string(),
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(resource);
            }
        }
        tracing::trace!(resource = %name, "resource registered");
        self.notify(&DirectoryEvent::Registered(name));
        Ok(())
    }

    /// Remove the resource under `name` and notify matching listeners.
    pub fn unregister(&self, name: &ResourceName) -> Result<(), DirectoryError> {
        if self.resources.remove(name).is_none() {
            return Err(DirectoryError::InstanceNotFound {
                name: name.to_string(),
            });
        }
        tracing::trace!(resource = %name, "resource unregistered");
        self.notify(&DirectoryEvent::Unregistered(name.clone()));
        Ok(())
    }

    pub fn is_registered(&self, name: &ResourceName) -> bool {
        self.resources.contains_key(name)
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&self, event: &DirectoryEvent) {
        let mut targets: Vec<(SubscriptionId, EventListener)> = self
            .subscribers
            .iter()
            .filter(|entry| (entry.filter)(event))
            .map(|entry| (*entry.key(), Arc::clone(&entry.listener)))
            .collect();
        targets.sort_by_key(|(id, _)| *id);

        for (id, listener) in targets {
            let result = catch_unwind(AssertUnwindSafe(|| listener(event)));
            if result.is_err() {
                tracing::warn!(subscription = %id, resource = %event.name(), "listener panicked");
            }
        }
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceDirectory for InMemoryDirectory {
    fn query_names(&self, pattern: &ResourcePattern) -> Result<Vec<ResourceName>, DirectoryError> {
        Ok(self
            .resources
            .iter()
            .filter(|entry| pattern.matches(entry.key()))
            .map(|entry| entry.key().clone())
            .collect())
    }

    fn get_attribute(
        &self,
        name: &ResourceName,
        attribute: &str,
    ) -> Result<AttributeValue, DirectoryError> {
        let resource = self
            .resources
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DirectoryError::InstanceNotFound {
                name: name.to_string(),
            })?;
        resource
            .attribute(attribute)
            .ok_or_else(|| DirectoryError::AttributeNotFound {
                name: name.to_string(),
                attribute: attribute.to_string(),
            })
    }

    fn subscribe(
        &self,
        filter: EventFilter,
        listener: EventListener,
    ) -> Result<SubscriptionId, DirectoryError> {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.insert(id, Subscriber { filter, listener });
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<(), DirectoryError> {
        self.subscribers
            .remove(&id)
            .map(|_| ())
            .ok_or(DirectoryError::ListenerNotFound(id))
    }
}
