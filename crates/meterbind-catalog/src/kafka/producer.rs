use std::sync::Arc;

use meterbind_core::config::defaults::DEFAULT_KAFKA_PRODUCER_PREFIX;
use meterbind_core::errors::BindReport;
use meterbind_core::{
    BindError, MeterBindConfig, MetricsRegistry, ResourceDirectory, TagSet, TimeUnit,
};

use super::{kafka_tag_extractor, COMMON_METRICS};
use crate::binder::{merge_step, CatalogBinder};
use crate::metric_set::MetricSet;
use crate::table::{counter, gauge, time_gauge, MeterDef};

const DOMAIN: &str = "kafka.producer";

const PRODUCER_METRICS: &[MeterDef] = &[
    gauge(
        "waiting-threads",
        "waiting-threads",
        "The number of user threads blocked waiting for buffer memory to enqueue their records.",
    ),
    gauge(
        "buffer-total-bytes",
        "buffer-total-bytes",
        "The maximum amount of buffer memory the client can use (whether or not it is currently used).",
    ),
    gauge(
        "buffer-available-bytes",
        "buffer-available-bytes",
        "The total amount of buffer memory that is not being used (either unallocated or in the free list).",
    ),
    gauge(
        "bufferpool-wait-time",
        "bufferpool-wait-time",
        "The fraction of time an appender waits for space allocation.",
    ),
];

const SENDER_METRICS: &[MeterDef] = &[
    gauge(
        "batch-size-avg",
        "batch-size-avg",
        "The average number of bytes sent per partition per-request.",
    ),
    gauge(
        "batch-size-max",
        "batch-size-max",
        "The max number of bytes sent per partition per-request.",
    ),
    gauge(
        "batch-split-rate",
        "batch-split-rate",
        "The average number of batch splits per second.",
    ),
    counter(
        "batch-split-total",
        "batch-split-total",
        "The total number of batch splits.",
    ),
    gauge(
        "compression-rate-avg",
        "compression-rate-avg",
        "The average compression rate of record batches.",
    ),
    time_gauge(
        "metadata-age",
        "metadata-age",
        "The age of the current producer metadata being used.",
        TimeUnit::Seconds,
    ),
    time_gauge(
        "produce-throttle-time-avg",
        "produce-throttle-time-avg",
        "The average time a request was throttled by a broker.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "produce-throttle-time-max",
        "produce-throttle-time-max",
        "The maximum time a request was throttled by a broker.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "record-queue-time-avg",
        "record-queue-time-avg",
        "The average time record batches spent in the send buffer.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "record-queue-time-max",
        "record-queue-time-max",
        "The maximum time record batches spent in the send buffer.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "record-size-avg",
        "record-size-avg",
        "The average record size.",
    ),
    gauge(
        "record-size-max",
        "record-size-max",
        "The maximum record size.",
    ),
    gauge(
        "records-per-request-avg",
        "records-per-request-avg",
        "The average number of records per request.",
    ),
    time_gauge(
        "request-latency-avg",
        "request-latency-avg",
        "The average request latency.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "request-latency-max",
        "request-latency-max",
        "The maximum request latency.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "requests-in-flight",
        "requests-in-flight",
        "The current number of in-flight requests awaiting a response.",
    ),
];

const PER_TOPIC_SENDER_METRICS: &[MeterDef] = &[
    gauge(
        "byte-rate",
        "byte-rate",
        "The average number of bytes sent per second for a topic.",
    ),
    counter(
        "byte-total",
        "byte-total",
        "The total number of bytes sent for a topic.",
    ),
    gauge(
        "compression-rate",
        "compression-rate",
        "The average compression rate of record batches for a topic.",
    ),
    gauge(
        "record-error-rate",
        "record-error-rate",
        "The average per-second number of record sends that resulted in errors for a topic.",
    ),
    counter(
        "record-error-total",
        "record-error-total",
        "The total number of record sends that resulted in errors for a topic.",
    ),
    gauge(
        "record-retry-rate",
        "record-retry-rate",
        "The average per-second number of retried record sends for a topic.",
    ),
    counter(
        "record-retry-total",
        "record-retry-total",
        "The total number of retried record sends for a topic.",
    ),
    gauge(
        "record-send-rate",
        "record-send-rate",
        "The average number of records sent per second for a topic.",
    ),
    counter(
        "record-send-total",
        "record-send-total",
        "The total number of records sent for a topic.",
    ),
];

/// Producer, sender and selector metrics for every Kafka producer client.
pub struct KafkaProducerMetrics {
    binder: CatalogBinder,
}

impl KafkaProducerMetrics {
    /// No extra tags, default `kafka.producer.` prefix.
    pub fn new(directory: Arc<dyn ResourceDirectory>) -> Self {
        Self::with_options(TagSet::empty(), DEFAULT_KAFKA_PRODUCER_PREFIX, directory)
    }

    pub fn with_options(
        tags: TagSet,
        meter_name_prefix: &str,
        directory: Arc<dyn ResourceDirectory>,
    ) -> Self {
        Self {
            binder: CatalogBinder::new(
                DOMAIN,
                kafka_tag_extractor(),
                tags,
                meter_name_prefix,
                directory,
            ),
        }
    }

    /// `None` when `kafka_producer.enabled` is false.
    pub fn from_config(
        config: &MeterBindConfig,
        directory: Arc<dyn ResourceDirectory>,
    ) -> Option<Self> {
        if !config.kafka_producer.effective_enabled() {
            return None;
        }
        Some(Self {
            binder: CatalogBinder::from_config(
                DOMAIN,
                kafka_tag_extractor(),
                &config.binder,
                &config.kafka_producer,
                DEFAULT_KAFKA_PRODUCER_PREFIX,
                directory,
            ),
        })
    }

    pub fn meter_name_prefix(&self) -> &str {
        self.binder.prefix()
    }
}

impl MetricSet for KafkaProducerMetrics {
    fn name(&self) -> &'static str {
        "kafka-producer"
    }

    fn bind_to(&self, registry: Arc<dyn MetricsRegistry>) -> Result<BindReport, BindError> {
        let mut report = BindReport::new();
        merge_step(
            self.name(),
            &mut report,
            self.binder.bind_tables(
                &registry,
                "producer-metrics",
                &[COMMON_METRICS, PRODUCER_METRICS, SENDER_METRICS],
            ),
        )?;
        merge_step(
            self.name(),
            &mut report,
            self.binder
                .bind_tables(&registry, "producer-topic-metrics", &[PER_TOPIC_SENDER_METRICS]),
        )?;
        Ok(report)
    }

    fn close(&self) {
        self.binder.close();
    }
}
