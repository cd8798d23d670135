use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::Serialize;

use crate::errors::RegistryError;
use crate::{TagSet, TimeUnit};

/// Live read accessor handed to the registry. Invoked on every read.
pub type ValueFn = Arc<dyn Fn() -> f64 + Send + Sync>;

/// Opaque handle issued by a registry for one registered meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeterHandle(pub u64);

/// Kind of a registered meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterKind {
    Gauge,
    TimeGauge,
    FunctionCounter,
}

impl fmt::Display for MeterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gauge => "gauge",
            Self::TimeGauge => "time gauge",
            Self::FunctionCounter => "function counter",
        })
    }
}

/// Identity of a meter: name plus tags. The description rides along but
/// does not take part in equality, so re-registering with a different
/// description resolves to the same meter.
#[derive(Debug, Clone, Serialize)]
pub struct MeterId {
    pub name: String,
    pub tags: TagSet,
    pub description: Option<String>,
}

impl MeterId {
    pub fn new(name: impl Into<String>, tags: TagSet) -> Self {
        Self {
            name: name.into(),
            tags,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl PartialEq for MeterId {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.tags == other.tags
    }
}

impl Eq for MeterId {}

impl Hash for MeterId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.tags.hash(state);
    }
}

impl fmt::Display for MeterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.tags)
    }
}

/// Sink that owns meters and polls their accessors.
///
/// Registering an id that is already present returns the existing handle
/// and drops the new accessor. A registry may invoke an accessor from any
/// thread, including concurrently with the registration call that installed it.
pub trait MetricsRegistry: Send + Sync {
    fn register_gauge(&self, id: MeterId, accessor: ValueFn) -> Result<MeterHandle, RegistryError>;

    /// `unit` is the unit the accessor reports in; the registry converts to
    /// its own base unit on read.
    fn register_time_gauge(
        &self,
        id: MeterId,
        unit: TimeUnit,
        accessor: ValueFn,
    ) -> Result<MeterHandle, RegistryError>;

    fn register_function_counter(
        &self,
        id: MeterId,
        accessor: ValueFn,
    ) -> Result<MeterHandle, RegistryError>;

    /// Drop a meter. Returns false if the handle is unknown or already removed.
    fn remove(&self, handle: MeterHandle) -> bool;
}
