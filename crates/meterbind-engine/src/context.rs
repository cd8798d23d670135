//! Per-resource binding context handed to binding callbacks.

use std::sync::Arc;

use meterbind_core::traits::{MeterKind, ValueFn};
use meterbind_core::{
    BindError, MeterHandle, MeterId, MetricsRegistry, RegistryError, ResourceDirectory,
    ResourceName, TagSet, TimeUnit,
};

use crate::accessor::SelfHealingAccessor;

/// One matched resource, its merged tags, and the collaborators needed to
/// bind its attributes.
///
/// A context is created fresh for every resource found by discovery and for
/// every registration event, and lives only for the duration of the callback.
pub struct BindingContext {
    directory: Arc<dyn ResourceDirectory>,
    registry: Arc<dyn MetricsRegistry>,
    name: ResourceName,
    tags: TagSet,
}

impl BindingContext {
    pub fn new(
        directory: Arc<dyn ResourceDirectory>,
        registry: Arc<dyn MetricsRegistry>,
        name: ResourceName,
        tags: TagSet,
    ) -> Self {
        Self {
            directory,
            registry,
            name,
            tags,
        }
    }

    pub fn name(&self) -> &ResourceName {
        &self.name
    }

    /// Preset tags followed by the tags extracted from the resource name.
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Bind `attribute` as a gauge reporting its current value.
    pub fn bind_gauge(
        &self,
        attribute: &str,
        meter_name: &str,
        description: &str,
    ) -> Result<(), BindError> {
        self.bind(MeterKind::Gauge, attribute, meter_name, description, |id, accessor| {
            self.registry.register_gauge(id, accessor)
        })
    }

    /// Bind `attribute` as a time gauge. `unit` is the unit the attribute is
    /// expressed in; the registry converts on read.
    pub fn bind_time_gauge(
        &self,
        attribute: &str,
        meter_name: &str,
        description: &str,
        unit: TimeUnit,
    ) -> Result<(), BindError> {
        self.bind(MeterKind::TimeGauge, attribute, meter_name, description, |id, accessor| {
            self.registry.register_time_gauge(id, unit, accessor)
        })
    }

    /// Bind a monotonically increasing `attribute` as a function counter.
    pub fn bind_function_counter(
        &self,
        attribute: &str,
        meter_name: &str,
        description: &str,
    ) -> Result<(), BindError> {
        self.bind(MeterKind::FunctionCounter, attribute, meter_name, description, |id, accessor| {
            self.registry.register_function_counter(id, accessor)
        })
    }

    fn bind<R>(
        &self,
        kind: MeterKind,
        attribute: &str,
        meter_name: &str,
        description: &str,
        register: R,
    ) -> Result<(), BindError>
    where
        R: FnOnce(MeterId, ValueFn) -> Result<MeterHandle, RegistryError>,
    {
        let accessor = SelfHealingAccessor::new(
            Arc::downgrade(&self.directory),
            Arc::downgrade(&self.registry),
            self.name.clone(),
            attribute,
            meter_name,
        );
        let id = MeterId::new(meter_name, self.tags.clone()).with_description(description);

        let reader = Arc::clone(&accessor);
        let handle = register(id, Arc::new(move || reader.read()))?;
        accessor.arm(handle);

        tracing::trace!(
            resource = %self.name,
            meter = meter_name,
            %kind,
            removed = accessor.is_removed(),
            "meter bound"
        );
        Ok(())
    }
}
