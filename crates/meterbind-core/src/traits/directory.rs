use std::fmt;
use std::sync::Arc;

use crate::errors::DirectoryError;
use crate::{AttributeValue, ResourceName, ResourcePattern};

/// Handle of one notification subscription held against a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle notification emitted by a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    Registered(ResourceName),
    Unregistered(ResourceName),
}

impl DirectoryEvent {
    pub fn name(&self) -> &ResourceName {
        match self {
            Self::Registered(name) | Self::Unregistered(name) => name,
        }
    }

    pub fn is_registration(&self) -> bool {
        matches!(self, Self::Registered(_))
    }
}

/// Decides whether a listener is interested in an event.
pub type EventFilter = Arc<dyn Fn(&DirectoryEvent) -> bool + Send + Sync>;

/// Receives the events its filter accepted.
pub type EventListener = Arc<dyn Fn(&DirectoryEvent) + Send + Sync>;

/// A live registry of named, attribute-bearing resources.
///
/// Listeners may be invoked on any thread, concurrently with each other and
/// with the caller that subscribed them. Implementations must not hold
/// internal locks while invoking a listener, because listeners call back
/// into the directory.
pub trait ResourceDirectory: Send + Sync {
    /// Names of all registered resources matching `pattern`, in no particular order.
    fn query_names(&self, pattern: &ResourcePattern) -> Result<Vec<ResourceName>, DirectoryError>;

    /// Current value of `attribute` on `name`.
    fn get_attribute(
        &self,
        name: &ResourceName,
        attribute: &str,
    ) -> Result<AttributeValue, DirectoryError>;

    /// Start delivering the events `filter` accepts to `listener`.
    fn subscribe(
        &self,
        filter: EventFilter,
        listener: EventListener,
    ) -> Result<SubscriptionId, DirectoryError>;

    /// Stop a subscription. Fails with [`DirectoryError::ListenerNotFound`] if it is already gone.
    fn unsubscribe(&self, id: SubscriptionId) -> Result<(), DirectoryError>;
}
