//! The MetricSet trait and config-driven assembly of the standard sets.

use std::sync::Arc;

use meterbind_core::errors::BindReport;
use meterbind_core::{BindError, MeterBindConfig, MetricsRegistry, ResourceDirectory};

use crate::{KafkaConsumerMetrics, KafkaProducerMetrics, ThreadingMetrics};

/// A group of meters bound as a unit and released together.
pub trait MetricSet: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Bind existing resources and keep binding new ones until closed.
    ///
    /// Sets covering several resource types bind them in order. If one type
    /// fails, the types before it stay bound and subscribed until [`close`].
    ///
    /// [`close`]: MetricSet::close
    fn bind_to(&self, registry: Arc<dyn MetricsRegistry>) -> Result<BindReport, BindError>;

    /// Stop binding new resources. Meters already bound stay registered.
    fn close(&self);
}

/// Every standard set that `config` leaves enabled, in a fixed order:
/// Kafka producer, Kafka consumer, threading.
pub fn enabled_metric_sets(
    config: &MeterBindConfig,
    directory: Arc<dyn ResourceDirectory>,
) -> Vec<Box<dyn MetricSet>> {
    let mut sets: Vec<Box<dyn MetricSet>> = Vec::new();
    if let Some(set) = KafkaProducerMetrics::from_config(config, Arc::clone(&directory)) {
        sets.push(Box::new(set));
    }
    if let Some(set) = KafkaConsumerMetrics::from_config(config, Arc::clone(&directory)) {
        sets.push(Box::new(set));
    }
    if let Some(set) = ThreadingMetrics::from_config(config, directory) {
        sets.push(Box::new(set));
    }
    tracing::debug!(
        sets = ?sets.iter().map(|s| s.name()).collect::<Vec<_>>(),
        "metric sets enabled"
    );
    sets
}
