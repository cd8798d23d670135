use std::sync::Arc;

use meterbind_core::config::defaults::DEFAULT_KAFKA_CONSUMER_PREFIX;
use meterbind_core::errors::BindReport;
use meterbind_core::{
    BindError, MeterBindConfig, MetricsRegistry, ResourceDirectory, TagSet, TimeUnit,
};
use meterbind_engine::BindingContext;

use super::{kafka_tag_extractor, COMMON_METRICS};
use crate::binder::{merge_step, CatalogBinder};
use crate::metric_set::MetricSet;
use crate::table::{bind_tables, counter, gauge, time_gauge, MeterDef};

const DOMAIN: &str = "kafka.consumer";

const CONSUMER_METRICS: &[MeterDef] = &[
    time_gauge(
        "time-between-poll-avg",
        "time-between-poll-avg",
        "The average delay between invocations of poll().",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "time-between-poll-max",
        "time-between-poll-max",
        "The max delay between invocations of poll().",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "last-poll-seconds-ago",
        "last-poll-ago",
        "Time since the last poll() invocation.",
        TimeUnit::Seconds,
    ),
    gauge(
        "poll-idle-ratio-avg",
        "poll-idle-ratio-avg",
        "The average fraction of time the consumer's poll() is idle as opposed to waiting for the user code to process records.",
    ),
];

const COORDINATOR_METRICS: &[MeterDef] = &[
    time_gauge(
        "commit-latency-avg",
        "commit-latency-avg",
        "The average time taken for a commit request.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "commit-latency-max",
        "commit-latency-max",
        "The max time taken for a commit request.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "commit-rate",
        "commit-rate",
        "The number of commit calls per second.",
    ),
    counter(
        "commit-total",
        "commit-total",
        "The total number of commit calls.",
    ),
    gauge(
        "assigned-partitions",
        "assigned-partitions",
        "The number of partitions currently assigned to this consumer.",
    ),
    time_gauge(
        "heartbeat-response-time-max",
        "heartbeat-response-time-max",
        "The max time taken to receive a response to a heartbeat request.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "heartbeat-rate",
        "heartbeat-rate",
        "The average number of heartbeats per second.",
    ),
    counter(
        "heartbeat-total",
        "heartbeat-total",
        "The total number of heartbeats.",
    ),
    time_gauge(
        "join-time-avg",
        "join-time-avg",
        "The average time taken for a group rejoin.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "join-time-max",
        "join-time-max",
        "The max time taken for a group rejoin.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "join-rate",
        "join-rate",
        "The number of group joins per second.",
    ),
    counter(
        "join-total",
        "join-total",
        "The total number of group joins.",
    ),
    time_gauge(
        "sync-time-avg",
        "sync-time-avg",
        "The average time taken for a group sync.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "sync-time-max",
        "sync-time-max",
        "The max time taken for a group sync.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "sync-rate",
        "sync-rate",
        "The number of group syncs per second.",
    ),
    counter(
        "sync-total",
        "sync-total",
        "The total number of group syncs.",
    ),
    time_gauge(
        "rebalance-latency-avg",
        "rebalance-latency-avg",
        "The average time taken for a group rebalance.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "rebalance-latency-max",
        "rebalance-latency-max",
        "The max time taken for a group rebalance.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "rebalance-latency-total",
        "rebalance-latency-total",
        "The total time taken for group rebalances so far.",
        TimeUnit::Milliseconds,
    ),
    counter(
        "rebalance-total",
        "rebalance-total",
        "The total number of group rebalances participated.",
    ),
    gauge(
        "rebalance-rate-per-hour",
        "rebalance-rate-per-hour",
        "The number of group rebalance participated per hour.",
    ),
    counter(
        "failed-rebalance-total",
        "failed-rebalance-total",
        "The total number of failed group rebalances.",
    ),
    gauge(
        "failed-rebalance-rate-per-hour",
        "failed-rebalance-rate-per-hour",
        "The number of failed group rebalance event per hour.",
    ),
    time_gauge(
        "last-rebalance-seconds-ago",
        "last-rebalance-ago",
        "The number of seconds since the last rebalance event.",
        TimeUnit::Seconds,
    ),
    time_gauge(
        "last-heartbeat-seconds-ago",
        "last-heartbeat-ago",
        "The number of seconds since the last controller heartbeat.",
        TimeUnit::Seconds,
    ),
    time_gauge(
        "partitions-revoked-latency-avg",
        "partitions-revoked-latency-avg",
        "The average time taken by the on-partitions-revoked rebalance listener callback.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "partitions-revoked-latency-max",
        "partitions-revoked-latency-max",
        "The max time taken by the on-partitions-revoked rebalance listener callback.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "partitions-assigned-latency-avg",
        "partitions-assigned-latency-avg",
        "The average time taken by the on-partitions-assigned rebalance listener callback.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "partitions-assigned-latency-max",
        "partitions-assigned-latency-max",
        "The max time taken by the on-partitions-assigned rebalance listener callback.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "partitions-lost-latency-avg",
        "partitions-lost-latency-avg",
        "The average time taken by the on-partitions-lost rebalance listener callback.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "partitions-lost-latency-max",
        "partitions-lost-latency-max",
        "The max time taken by the on-partitions-lost rebalance listener callback.",
        TimeUnit::Milliseconds,
    ),
];

/// Fetch-manager metrics reported per client, topic and partition.
const FETCH_PARTITION_METRICS: &[MeterDef] = &[
    gauge(
        "preferred-read-replica",
        "preferred-read-replica",
        "The current read replica for the partition, or -1 if reading from leader.",
    ),
    gauge(
        "records-lag",
        "records-lag",
        "The latest lag of the partition.",
    ),
    gauge(
        "records-lag-avg",
        "records-lag-avg",
        "The average lag of the partition.",
    ),
    gauge(
        "records-lag-max",
        "records-lag-max",
        "The max lag of the partition.",
    ),
    gauge(
        "records-lead",
        "records-lead",
        "The latest lead of the partition.",
    ),
    gauge(
        "records-lead-avg",
        "records-lead-avg",
        "The average lead of the partition.",
    ),
    gauge(
        "records-lead-min",
        "records-lead-min",
        "The min lead of the partition.",
    ),
];

/// Fetch-manager metrics reported per client and topic.
const FETCH_TOPIC_METRICS: &[MeterDef] = &[
    gauge(
        "bytes-consumed-rate",
        "bytes-consumed-rate",
        "The average number of bytes consumed per second for a topic.",
    ),
    counter(
        "bytes-consumed-total",
        "bytes-consumed-total",
        "The total number of bytes consumed for a topic.",
    ),
    gauge(
        "fetch-size-avg",
        "fetch-size-avg",
        "The average number of bytes fetched per request for a topic.",
    ),
    gauge(
        "fetch-size-max",
        "fetch-size-max",
        "The maximum number of bytes fetched per request for a topic.",
    ),
    gauge(
        "records-consumed-rate",
        "records-consumed-rate",
        "The average number of records consumed per second for a topic.",
    ),
    counter(
        "records-consumed-total",
        "records-consumed-total",
        "The total number of records consumed for a topic.",
    ),
    gauge(
        "records-per-request-avg",
        "records-per-request-avg",
        "The average number of records in each request for a topic.",
    ),
];

/// Fetch-manager metrics reported per client only.
const FETCH_CLIENT_METRICS: &[MeterDef] = &[
    time_gauge(
        "fetch-latency-avg",
        "fetch-latency-avg",
        "The average time taken for a fetch request.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "fetch-latency-max",
        "fetch-latency-max",
        "The max time taken for any fetch request.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "fetch-rate",
        "fetch-rate",
        "The number of fetch requests per second.",
    ),
    time_gauge(
        "fetch-throttle-time-avg",
        "fetch-throttle-time-avg",
        "The average throttle time.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "fetch-throttle-time-max",
        "fetch-throttle-time-max",
        "The maximum throttle time.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "fetch-total",
        "fetch-total",
        "The total number of fetch requests.",
    ),
];

/// Fetch-manager resources share one type name; the granularity shows in
/// which key properties made it into the tags.
fn fetch_manager_table(ctx: &BindingContext) -> &'static [MeterDef] {
    let tags = ctx.tags();
    if tags.has_keys(&["topic", "partition"]) {
        FETCH_PARTITION_METRICS
    } else if tags.has_keys(&["topic"]) {
        FETCH_TOPIC_METRICS
    } else {
        FETCH_CLIENT_METRICS
    }
}

/// Consumer, coordinator, fetch-manager and selector metrics for every
/// Kafka consumer client.
pub struct KafkaConsumerMetrics {
    binder: CatalogBinder,
}

impl KafkaConsumerMetrics {
    /// No extra tags, default `kafka.consumer.` prefix.
    pub fn new(directory: Arc<dyn ResourceDirectory>) -> Self {
        Self::with_options(TagSet::empty(), DEFAULT_KAFKA_CONSUMER_PREFIX, directory)
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

    /// `None` when `kafka_consumer.enabled` is false.
    pub fn from_config(
        config: &MeterBindConfig,
        directory: Arc<dyn ResourceDirectory>,
    ) -> Option<Self> {
        if !config.kafka_consumer.effective_enabled() {
            return None;
        }
        Some(Self {
            binder: CatalogBinder::from_config(
                DOMAIN,
                kafka_tag_extractor(),
                &config.binder,
                &config.kafka_consumer,
                DEFAULT_KAFKA_CONSUMER_PREFIX,
                directory,
            ),
        })
    }

    pub fn meter_name_prefix(&self) -> &str {
        self.binder.prefix()
    }
}

impl MetricSet for KafkaConsumerMetrics {
    fn name(&self) -> &'static str {
        "kafka-consumer"
    }

    fn bind_to(&self, registry: Arc<dyn MetricsRegistry>) -> Result<BindReport, BindError> {
        let mut report = BindReport::new();
        merge_step(
            self.name(),
            &mut report,
            self.binder
                .bind_tables(&registry, "consumer-metrics", &[COMMON_METRICS, CONSUMER_METRICS]),
        )?;
        merge_step(
            self.name(),
            &mut report,
            self.binder.bind_tables(
                &registry,
                "consumer-coordinator-metrics",
                &[COORDINATOR_METRICS],
            ),
        )?;
        merge_step(
            self.name(),
            &mut report,
            self.binder
                .bind_with(&registry, "consumer-fetch-manager-metrics", |ctx, prefix| {
                    bind_tables(ctx, prefix, &[fetch_manager_table(ctx)])
                }),
        )?;
        Ok(report)
    }

    fn close(&self) {
        self.binder.close();
    }
}
