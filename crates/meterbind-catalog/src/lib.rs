//! # meterbind-catalog
//!
//! Metric sets that bind well-known resource types through a
//! [`BindingEngine`](meterbind_engine::BindingEngine):
//!
//! - [`KafkaProducerMetrics`] for `kafka.producer` resources
//! - [`KafkaConsumerMetrics`] for `kafka.consumer` resources
//! - [`ThreadingMetrics`] for the `java.lang:type=Threading` resource

mod binder;
pub mod kafka;
pub mod metric_set;
pub mod table;
pub mod threading;

pub use kafka::{KafkaConsumerMetrics, KafkaProducerMetrics};
pub use metric_set::{enabled_metric_sets, MetricSet};
pub use table::{MeterDef, MeterDefKind};
pub use threading::ThreadingMetrics;
