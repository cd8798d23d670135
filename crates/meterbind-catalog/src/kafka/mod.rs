//! Kafka client metric sets.
//!
//! Kafka clients publish one resource per client (`client-id`), and for some
//! types one per topic or partition as well. Those key properties become
//! meter tags: `client-id` as `client.id`, then `topic`, `partition`, `node`.

mod consumer;
mod producer;

pub use consumer::KafkaConsumerMetrics;
pub use producer::KafkaProducerMetrics;

use meterbind_core::{KeyPropertyExtractor, TimeUnit};

use crate::table::{counter, gauge, time_gauge, MeterDef};

/// Tag extractor for Kafka client resource names.
pub fn kafka_tag_extractor() -> KeyPropertyExtractor {
    KeyPropertyExtractor::new()
        .with("client-id", "client.id")
        .with_same("topic")
        .with_same("partition")
        .with_same("node")
}

/// Selector metrics common to producers and consumers.
pub const COMMON_METRICS: &[MeterDef] = &[
    gauge(
        "connection-close-rate",
        "connection-close-rate",
        "Connections closed per second in the window.",
    ),
    counter(
        "connection-close-total",
        "connection-close-total",
        "Total connections closed in the window.",
    ),
    gauge(
        "connection-creation-rate",
        "connection-creation-rate",
        "New connections established per second in the window.",
    ),
    counter(
        "connection-creation-total",
        "connection-creation-total",
        "Total new connections established in the window.",
    ),
    gauge(
        "network-io-rate",
        "network-io-rate",
        "The average number of network operations (reads or writes) on all connections per second.",
    ),
    counter(
        "network-io-total",
        "network-io-total",
        "The total number of network operations (reads or writes) on all connections.",
    ),
    gauge(
        "outgoing-byte-rate",
        "outgoing-byte-rate",
        "The average number of outgoing bytes sent per second to all servers.",
    ),
    counter(
        "outgoing-byte-total",
        "outgoing-byte-total",
        "The total number of outgoing bytes sent to all servers.",
    ),
    gauge(
        "request-rate",
        "request-rate",
        "The average number of requests sent per second.",
    ),
    counter(
        "request-total",
        "request-total",
        "The total number of requests sent.",
    ),
    gauge(
        "request-size-avg",
        "request-size-avg",
        "The average size of all requests in the window.",
    ),
    gauge(
        "request-size-max",
        "request-size-max",
        "The maximum size of any request sent in the window.",
    ),
    gauge(
        "incoming-byte-rate",
        "incoming-byte-rate",
        "Bytes/second read off all sockets.",
    ),
    counter(
        "incoming-byte-total",
        "incoming-byte-total",
        "Total bytes read off all sockets.",
    ),
    gauge(
        "response-rate",
        "response-rate",
        "Responses received per second.",
    ),
    counter(
        "response-total",
        "response-total",
        "Total responses received.",
    ),
    gauge(
        "select-rate",
        "select-rate",
        "Number of times the I/O layer checked for new I/O to perform per second.",
    ),
    counter(
        "select-total",
        "select-total",
        "Total number of times the I/O layer checked for new I/O to perform.",
    ),
    time_gauge(
        "io-wait-time-ns-avg",
        "io-wait-time-avg",
        "The average length of time the I/O thread spent waiting for a socket ready for reads or writes.",
        TimeUnit::Nanoseconds,
    ),
    gauge(
        "io-wait-ratio",
        "io-wait-ratio",
        "The fraction of time the I/O thread spent waiting.",
    ),
    time_gauge(
        "io-time-ns-avg",
        "io-time-avg",
        "The average length of time for I/O per select call.",
        TimeUnit::Nanoseconds,
    ),
    gauge(
        "io-ratio",
        "io-ratio",
        "The fraction of time the I/O thread spent doing I/O.",
    ),
    gauge(
        "connection-count",
        "connection-count",
        "The current number of active connections.",
    ),
    gauge(
        "successful-authentication-rate",
        "successful-authentication-rate",
        "Connections per second that were successfully authenticated using SASL or SSL.",
    ),
    counter(
        "successful-authentication-total",
        "successful-authentication-total",
        "Total connections that were successfully authenticated using SASL or SSL.",
    ),
    gauge(
        "failed-authentication-rate",
        "failed-authentication-rate",
        "Connections per second that failed authentication.",
    ),
    counter(
        "failed-authentication-total",
        "failed-authentication-total",
        "Total connections that failed authentication.",
    ),
    gauge(
        "successful-reauthentication-rate",
        "successful-reauthentication-rate",
        "Connections per second that were successfully re-authenticated using SASL.",
    ),
    counter(
        "successful-reauthentication-total",
        "successful-reauthentication-total",
        "Total connections that were successfully re-authenticated using SASL.",
    ),
    time_gauge(
        "reauthentication-latency-max",
        "reauthentication-latency-max",
        "The maximum latency observed due to re-authentication.",
        TimeUnit::Milliseconds,
    ),
    time_gauge(
        "reauthentication-latency-avg",
        "reauthentication-latency-avg",
        "The average latency observed due to re-authentication.",
        TimeUnit::Milliseconds,
    ),
    gauge(
        "failed-reauthentication-rate",
        "failed-reauthentication-rate",
        "Connections per second that failed re-authentication.",
    ),
    counter(
        "failed-reauthentication-total",
        "failed-reauthentication-total",
        "Total connections that failed re-authentication.",
    ),
    counter(
        "successful-authentication-no-reauth-total",
        "successful-authentication-no-reauth-total",
        "Total connections that were successfully authenticated by older, pre-2.2.0 SASL clients that do not support re-authentication.",
    ),
];
