//! Seams to the two external collaborators: the resource directory that
//! owns the resources, and the metrics registry that owns the meters.

pub mod directory;
pub mod registry;

pub use directory::{DirectoryEvent, EventFilter, EventListener, ResourceDirectory, SubscriptionId};
pub use registry::{MeterHandle, MeterId, MeterKind, MetricsRegistry, ValueFn};
