//! Self-healing read accessor shared by every bound meter.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use meterbind_core::errors::MeterBindErrorCode;
use meterbind_core::{DirectoryError, MeterHandle, MetricsRegistry, ResourceDirectory, ResourceName};

/// Registered, handle not yet known.
const UNARMED: u8 = 0;
/// Handle known, meter live.
const ARMED: u8 = 1;
/// A read failed before the handle was known; the arming thread removes.
const PENDING_REMOVAL: u8 = 2;
/// Removal issued. Terminal.
const REMOVED: u8 = 3;

/// Reads one attribute and removes its own meter the first time that fails.
///
/// The registry only learns the meter handle after registration returns,
/// so the handle lives in a write-once slot filled by [`arm`](Self::arm).
/// A failure observed before arming is parked in `PENDING_REMOVAL` and the
/// removal is carried out by `arm`. Every path into `REMOVED` goes through a
/// compare-exchange, so the registry sees exactly one `remove` per meter.
///
/// Directory and registry are held weakly: the registry owns this accessor
/// and the directory owns the engine's listener, which owns the registry.
pub(crate) struct SelfHealingAccessor {
    directory: Weak<dyn ResourceDirectory>,
    registry: Weak<dyn MetricsRegistry>,
    resource: ResourceName,
    attribute: String,
    meter: String,
    handle: OnceLock<MeterHandle>,
    state: AtomicU8,
}

impl SelfHealingAccessor {
    pub(crate) fn new(
        directory: Weak<dyn ResourceDirectory>,
        registry: Weak<dyn MetricsRegistry>,
        resource: ResourceName,
        attribute: &str,
        meter: &str,
    ) -> Arc<Self> {
        Arc::new(Self {
            directory,
            registry,
            resource,
            attribute: attribute.to_string(),
            meter: meter.to_string(),
            handle: OnceLock::new(),
            state: AtomicU8::new(UNARMED),
        })
    }

    /// Current attribute value, or NaN after unbinding the meter.
    pub(crate) fn read(&self) -> f64 {
        match self.fetch() {
            Ok(value) => value,
            Err(cause) => {
                self.unbind(&cause);
                f64::NAN
            }
        }
    }

    /// Publish the registry handle. Completes a removal requested before arming.
    pub(crate) fn arm(&self, handle: MeterHandle) {
        if self.handle.set(handle).is_err() {
            return;
        }
        match self
            .state
            .compare_exchange(UNARMED, ARMED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {}
            Err(PENDING_REMOVAL) => {
                if self
                    .state
                    .compare_exchange(PENDING_REMOVAL, REMOVED, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    self.remove_from_registry();
                }
            }
            Err(_) => {}
        }
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.state.load(Ordering::Acquire) == REMOVED
    }

    fn fetch(&self) -> Result<f64, DirectoryError> {
        let directory = self
            .directory
            .upgrade()
            .ok_or_else(|| DirectoryError::Unavailable {
                reason: "resource directory dropped".to_string(),
            })?;
        directory
            .get_attribute(&self.resource, &self.attribute)?
            .as_f64(&self.attribute)
    }

    fn unbind(&self, cause: &DirectoryError) {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            let next = match current {
                UNARMED => PENDING_REMOVAL,
                ARMED => REMOVED,
                _ => return,
            };
            match self
                .state
                .compare_exchange(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }

        tracing::debug!(
            resource = %self.resource,
            attribute = %self.attribute,
            meter = %self.meter,
            error_code = cause.error_code(),
            error = %cause,
            "attribute unreadable, unbinding meter"
        );

        if current == ARMED {
            self.remove_from_registry();
        }
    }

    fn remove_from_registry(&self) {
        let (Some(handle), Some(registry)) = (self.handle.get(), self.registry.upgrade()) else {
            return;
        };
        if !registry.remove(*handle) {
            tracing::trace!(meter = %self.meter, "meter already absent from registry");
        }
    }
}
