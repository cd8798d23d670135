//! Tests for the Kafka producer and consumer metric sets.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use meterbind_catalog::kafka::kafka_tag_extractor;
use meterbind_catalog::{KafkaConsumerMetrics, KafkaProducerMetrics, MetricSet};
use meterbind_core::traits::{EventFilter, EventListener, MeterKind};
use meterbind_core::{
    AttributeValue, BindError, DirectoryError, MeterBindConfig, ResourceDirectory, ResourceName,
    ResourcePattern, SubscriptionId, TagExtractor, TagSet, TimeUnit,
};
use meterbind_simple::{AttributeMap, InMemoryDirectory, SimpleRegistry};

fn register(directory: &InMemoryDirectory, name: &str) -> Arc<AttributeMap> {
    let attrs = Arc::new(AttributeMap::new());
    directory
        .register(ResourceName::parse(name).unwrap(), Arc::clone(&attrs))
        .unwrap();
    attrs
}

/// Accepts a fixed number of subscriptions, then refuses the rest.
struct LimitedDirectory {
    inner: InMemoryDirectory,
    subscriptions_left: AtomicUsize,
}

impl ResourceDirectory for LimitedDirectory {
    fn query_names(&self, pattern: &ResourcePattern) -> Result<Vec<ResourceName>, DirectoryError> {
        self.inner.query_names(pattern)
    }

    fn get_attribute(
        &self,
        name: &ResourceName,
        attribute: &str,
    ) -> Result<AttributeValue, DirectoryError> {
        self.inner.get_attribute(name, attribute)
    }

    fn subscribe(
        &self,
        filter: EventFilter,
        listener: EventListener,
    ) -> Result<SubscriptionId, DirectoryError> {
        let left = self
            .subscriptions_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if left.is_err() {
            return Err(DirectoryError::Unavailable {
                reason: "subscription limit reached".into(),
            });
        }
        self.inner.subscribe(filter, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<(), DirectoryError> {
        self.inner.unsubscribe(id)
    }
}

fn keys(registry: &SimpleRegistry, meter: &str) -> Vec<String> {
    let found = registry
        .find(meter)
        .unwrap_or_else(|| panic!("meter {meter} not registered"));
    found.tags().keys().into_iter().map(String::from).collect()
}

#[test]
fn extractor_maps_kafka_key_properties_in_order() {
    let name = ResourceName::parse(
        "kafka.consumer:type=consumer-fetch-manager-metrics,partition=0,topic=orders,client-id=c1",
    )
    .unwrap();
    let tags = kafka_tag_extractor().extract(&name);
    assert_eq!(tags.keys(), vec!["client.id", "topic", "partition"]);
    assert_eq!(tags.get("client.id"), Some("c1"));

    let node =
        ResourceName::parse("kafka.producer:type=producer-node-metrics,client-id=c1,node-id=node-1")
            .unwrap();
    assert_eq!(kafka_tag_extractor().extract(&node).keys(), vec!["client.id"]);
}

#[test]
fn producer_binds_client_and_topic_metrics() {
    let directory = Arc::new(InMemoryDirectory::new());
    register(&directory, "kafka.producer:type=producer-metrics,client-id=client1");
    register(
        &directory,
        "kafka.producer:type=producer-topic-metrics,client-id=client1,topic=topic1",
    );

    let registry = Arc::new(SimpleRegistry::new());
    let metrics = KafkaProducerMetrics::with_options(TagSet::empty(), "kafka.producer.", directory);
    let report = metrics.bind_to(registry.clone()).unwrap();

    assert_eq!(report.bound, 2);
    assert!(report.is_clean());
    assert_eq!(keys(&registry, "kafka.producer.connection-close-rate"), vec!["client.id"]);
    assert_eq!(keys(&registry, "kafka.producer.waiting-threads"), vec!["client.id"]);
    assert_eq!(keys(&registry, "kafka.producer.batch-size-avg"), vec!["client.id"]);
    assert_eq!(keys(&registry, "kafka.producer.byte-rate"), vec!["client.id", "topic"]);
}

#[test]
fn producer_meter_kinds_follow_the_table() {
    let directory = Arc::new(InMemoryDirectory::new());
    let attrs = register(&directory, "kafka.producer:type=producer-metrics,client-id=c");
    attrs.set("io-wait-time-ns-avg", 2_000_000_000_i64);
    attrs.set("request-total", 42_i64);

    let registry = Arc::new(SimpleRegistry::new());
    KafkaProducerMetrics::new(directory).bind_to(registry.clone()).unwrap();

    let io_wait = registry.find("kafka.producer.io-wait-time-avg").unwrap();
    assert_eq!(io_wait.kind(), MeterKind::TimeGauge);
    assert_eq!(io_wait.value(), 2.0);
    assert_eq!(io_wait.value_in(TimeUnit::Milliseconds), 2_000.0);

    let requests = registry.find("kafka.producer.request-total").unwrap();
    assert_eq!(requests.kind(), MeterKind::FunctionCounter);
    assert_eq!(requests.count(), 42.0);
}

#[test]
fn consumer_splits_fetch_manager_metrics_by_granularity() {
    let directory = Arc::new(InMemoryDirectory::new());
    register(&directory, "kafka.consumer:type=consumer-metrics,client-id=client1");
    register(&directory, "kafka.consumer:type=consumer-coordinator-metrics,client-id=client1");
    register(&directory, "kafka.consumer:type=consumer-fetch-manager-metrics,client-id=client1");
    register(
        &directory,
        "kafka.consumer:type=consumer-fetch-manager-metrics,client-id=client1,topic=topic1",
    );
    register(
        &directory,
        "kafka.consumer:type=consumer-fetch-manager-metrics,client-id=client1,topic=topic1,partition=partition1",
    );

    let registry = Arc::new(SimpleRegistry::new());
    let metrics = KafkaConsumerMetrics::with_options(TagSet::empty(), "kafka.consumer.", directory);
    let report = metrics.bind_to(registry.clone()).unwrap();
    assert_eq!(report.bound, 5);

    assert_eq!(keys(&registry, "kafka.consumer.connection-close-rate"), vec!["client.id"]);
    assert_eq!(keys(&registry, "kafka.consumer.time-between-poll-avg"), vec!["client.id"]);
    assert_eq!(keys(&registry, "kafka.consumer.commit-latency-avg"), vec!["client.id"]);
    assert_eq!(
        keys(&registry, "kafka.consumer.preferred-read-replica"),
        vec!["client.id", "topic", "partition"]
    );
    assert_eq!(keys(&registry, "kafka.consumer.bytes-consumed-rate"), vec!["client.id", "topic"]);
    assert_eq!(keys(&registry, "kafka.consumer.fetch-latency-avg"), vec!["client.id"]);

    assert_eq!(registry.find_all("kafka.consumer.records-lag").len(), 1);
    assert_eq!(registry.find_all("kafka.consumer.fetch-size-avg").len(), 1);
    assert_eq!(registry.find_all("kafka.consumer.fetch-rate").len(), 1);
}

#[test]
fn consumer_binds_clients_that_appear_later() {
    let directory = Arc::new(InMemoryDirectory::new());
    let registry = Arc::new(SimpleRegistry::new());
    let metrics = KafkaConsumerMetrics::new(directory.clone());
    metrics.bind_to(registry.clone()).unwrap();
    assert!(registry.is_empty());

    let attrs = register(
        &directory,
        "kafka.consumer:type=consumer-coordinator-metrics,client-id=late",
    );
    attrs.set("assigned-partitions", 3_i64);

    let assigned = registry.find("kafka.consumer.assigned-partitions").unwrap();
    assert_eq!(assigned.value(), 3.0);
    assert_eq!(assigned.tags(), &TagSet::of("client.id", "late"));

    metrics.close();
    register(&directory, "kafka.consumer:type=consumer-coordinator-metrics,client-id=after-close");
    assert_eq!(registry.find_all("kafka.consumer.assigned-partitions").len(), 1);
}

#[test]
fn closed_client_meters_disappear_on_read() {
    let directory = Arc::new(InMemoryDirectory::new());
    let name = "kafka.producer:type=producer-topic-metrics,client-id=c,topic=t";
    let attrs = register(&directory, name);
    attrs.set("byte-rate", 10.0);

    let registry = Arc::new(SimpleRegistry::new());
    KafkaProducerMetrics::new(directory.clone()).bind_to(registry.clone()).unwrap();
    let byte_rate = registry.find("kafka.producer.byte-rate").unwrap();
    assert_eq!(byte_rate.value(), 10.0);

    directory.unregister(&ResourceName::parse(name).unwrap()).unwrap();
    assert!(byte_rate.value().is_nan());
    assert!(registry.find("kafka.producer.byte-rate").is_none());
}

#[test]
fn config_prefix_and_tags_apply() {
    let directory = Arc::new(InMemoryDirectory::new());
    register(&directory, "kafka.producer:type=producer-metrics,client-id=c");

    let config = MeterBindConfig::from_toml(
        r#"
[binder]
tags = [{ key = "env", value = "prod" }]

[kafka_producer]
meter_name_prefix = "producer_"
tags = [{ key = "team", value = "payments" }]
"#,
    )
    .unwrap();

    let metrics = KafkaProducerMetrics::from_config(&config, directory).unwrap();
    assert_eq!(metrics.meter_name_prefix(), "producer_");

    let registry = Arc::new(SimpleRegistry::new());
    metrics.bind_to(registry.clone()).unwrap();
    assert_eq!(keys(&registry, "producer_request-rate"), vec!["env", "team", "client.id"]);
}

#[test]
fn disabled_catalog_is_not_built() {
    let config = MeterBindConfig::from_toml("[kafka_consumer]\nenabled = false\n").unwrap();
    let directory = Arc::new(InMemoryDirectory::new());
    assert!(KafkaConsumerMetrics::from_config(&config, directory.clone()).is_none());
    assert!(KafkaProducerMetrics::from_config(&config, directory).is_some());
}

#[test]
fn failure_on_a_later_type_keeps_earlier_bindings_until_close() {
    let directory = Arc::new(LimitedDirectory {
        inner: InMemoryDirectory::new(),
        subscriptions_left: AtomicUsize::new(1),
    });
    register(&directory.inner, "kafka.producer:type=producer-metrics,client-id=c");
    register(&directory.inner, "kafka.producer:type=producer-topic-metrics,client-id=c,topic=t");

    let registry = Arc::new(SimpleRegistry::new());
    let metrics = KafkaProducerMetrics::new(directory.clone());
    let err = metrics.bind_to(registry.clone()).unwrap_err();
    match err {
        BindError::Subscribe { type_name, .. } => assert_eq!(type_name, "producer-topic-metrics"),
        other => panic!("unexpected error: {other}"),
    }

    assert!(registry.find("kafka.producer.request-rate").is_some());
    assert!(registry.find("kafka.producer.byte-rate").is_some());
    assert_eq!(directory.inner.subscriber_count(), 1);

    register(&directory.inner, "kafka.producer:type=producer-metrics,client-id=late");
    assert_eq!(registry.find_all("kafka.producer.request-rate").len(), 2);

    metrics.close();
    assert_eq!(directory.inner.subscriber_count(), 0);
}
