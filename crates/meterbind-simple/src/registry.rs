//! SimpleRegistry: in-memory meter store that polls accessors on read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use meterbind_core::traits::{MeterKind, ValueFn};
use meterbind_core::{MeterHandle, MeterId, MetricsRegistry, RegistryError, TagSet, TimeUnit};

/// Unit time gauges report in from [`RegisteredMeter::value`].
pub const BASE_TIME_UNIT: TimeUnit = TimeUnit::Seconds;

struct Meter {
    id: MeterId,
    kind: MeterKind,
    unit: Option<TimeUnit>,
    accessor: ValueFn,
}

/// Read view of one registered meter. Every read calls the accessor.
#[derive(Clone)]
pub struct RegisteredMeter {
    handle: MeterHandle,
    meter: Arc<Meter>,
}

impl RegisteredMeter {
    pub fn handle(&self) -> MeterHandle {
        self.handle
    }

    pub fn id(&self) -> &MeterId {
        &self.meter.id
    }

    pub fn name(&self) -> &str {
        &self.meter.id.name
    }

    pub fn tags(&self) -> &TagSet {
        &self.meter.id.tags
    }

    pub fn kind(&self) -> MeterKind {
        self.meter.kind
    }

    /// Current value. Time gauges are converted to [`BASE_TIME_UNIT`].
    pub fn value(&self) -> f64 {
        self.value_in(BASE_TIME_UNIT)
    }

    /// Current value of a time gauge in `unit`. Other kinds ignore `unit`.
    pub fn value_in(&self, unit: TimeUnit) -> f64 {
        let raw = (self.meter.accessor)();
        match self.meter.unit {
            Some(native) => native.convert(raw, unit),
            None => raw,
        }
    }

    /// Counter reading. Same as [`value`](Self::value) for function counters.
    pub fn count(&self) -> f64 {
        self.value()
    }
}

impl std::fmt::Debug for RegisteredMeter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredMeter")
            .field("handle", &self.handle)
            .field("id", &self.meter.id)
            .field("kind", &self.meter.kind)
            .finish()
    }
}

/// Point-in-time reading of one meter, suitable for export.
#[derive(Debug, Clone, Serialize)]
pub struct MeterSample {
    pub name: String,
    pub tags: TagSet,
    pub kind: MeterKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_unit: Option<TimeUnit>,
}

/// Thread-safe registry keyed by handle and by meter id.
///
/// Registering an id that already exists returns the existing handle
/// unless the kinds differ. Accessors are always invoked with no map
/// guard held, so an accessor may remove its own meter.
pub struct SimpleRegistry {
    meters: DashMap<MeterHandle, Arc<Meter>>,
    ids: DashMap<MeterId, MeterHandle>,
    next_handle: AtomicU64,
}

impl SimpleRegistry {
    pub fn new() -> Self {
        Self {
            meters: DashMap::new(),
            ids: DashMap::new(),
            next_handle: AtomicU64::new(1),
        }
    }

    /// First meter named `name`, in handle order.
    pub fn find(&self, name: &str) -> Option<RegisteredMeter> {
        self.find_all(name).into_iter().next()
    }

    /// Every meter named `name`, in handle order.
    pub fn find_all(&self, name: &str) -> Vec<RegisteredMeter> {
        let mut found: Vec<RegisteredMeter> = self
            .meters
            .iter()
            .filter(|entry| entry.value().id.name == name)
            .map(|entry| RegisteredMeter {
                handle: *entry.key(),
                meter: Arc::clone(entry.value()),
            })
            .collect();
        found.sort_by_key(RegisteredMeter::handle);
        found
    }

    /// Meter with exactly this name and tag set.
    pub fn find_tagged(&self, name: &str, tags: &TagSet) -> Option<RegisteredMeter> {
        let handle = *self.ids.get(&MeterId::new(name, tags.clone()))?;
        self.get(handle)
    }

    pub fn get(&self, handle: MeterHandle) -> Option<RegisteredMeter> {
        self.meters.get(&handle).map(|entry| RegisteredMeter {
            handle,
            meter: Arc::clone(entry.value()),
        })
    }

    pub fn len(&self) -> usize {
        self.meters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meters.is_empty()
    }

    /// Read every meter once, ordered by name then tags.
    pub fn snapshot(&self) -> Vec<MeterSample> {
        let meters: Vec<Arc<Meter>> = self.meters.iter().map(|e| Arc::clone(e.value())).collect();
        let mut samples: Vec<MeterSample> = meters
            .into_iter()
            .map(|meter| {
                let raw = (meter.accessor)();
                let (value, base_unit) = match meter.unit {
                    Some(native) => (native.convert(raw, BASE_TIME_UNIT), Some(BASE_TIME_UNIT)),
                    None => (raw, None),
                };
                MeterSample {
                    name: meter.id.name.clone(),
                    tags: meter.id.tags.clone(),
                    kind: meter.kind,
                    description: meter.id.description.clone(),
                    value,
                    base_unit,
                }
            })
            .collect();
        samples.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.tags.to_string().cmp(&b.tags.to_string()))
        });
        samples
    }

    fn register(
        &self,
        id: MeterId,
        kind: MeterKind,
        unit: Option<TimeUnit>,
        accessor: ValueFn,
    ) -> Result<MeterHandle, RegistryError> {
        validate_name(&id.name)?;

        match self.ids.entry(id.clone()) {
            Entry::Occupied(existing) => {
                let handle = *existing.get();
                match self.meters.get(&handle).map(|m| m.kind) {
                    Some(found) if found != kind => Err(RegistryError::KindConflict {
                        name: id.name,
                        existing: found.to_string(),
                    }),
                    _ => Ok(handle),
                }
            }
            Entry::Vacant(slot) => {
                let handle = MeterHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
                tracing::trace!(meter = %id, %kind, handle = handle.0, "meter registered");
                self.meters.insert(
                    handle,
                    Arc::new(Meter {
                        id,
                        kind,
                        unit,
                        accessor,
                    }),
                );
                slot.insert(handle);
                Ok(handle)
            }
        }
    }
}

impl Default for SimpleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRegistry for SimpleRegistry {
    fn register_gauge(&self, id: MeterId, accessor: ValueFn) -> Result<MeterHandle, RegistryError> {
        self.register(id, MeterKind::Gauge, None, accessor)
    }

    fn register_time_gauge(
        &self,
        id: MeterId,
        unit: TimeUnit,
        accessor: ValueFn,
    ) -> Result<MeterHandle, RegistryError> {
        self.register(id, MeterKind::TimeGauge, Some(unit), accessor)
    }

    fn register_function_counter(
        &self,
        id: MeterId,
        accessor: ValueFn,
    ) -> Result<MeterHandle, RegistryError> {
        self.register(id, MeterKind::FunctionCounter, None, accessor)
    }

    fn remove(&self, handle: MeterHandle) -> bool {
        let Some((_, meter)) = self.meters.remove(&handle) else {
            return false;
        };
        self.ids.remove_if(&meter.id, |_, h| *h == handle);
        tracing::trace!(meter = %meter.id, handle = handle.0, "meter removed");
        true
    }
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.chars().any(char::is_whitespace) {
        "must not contain whitespace"
    } else if name.starts_with('.') || name.ends_with('.') {
        "must not start or end with '.'"
    } else {
        return Ok(());
    };
    Err(RegistryError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
