//! Tests for ThreadingMetrics and config-driven metric set assembly.

use std::sync::Arc;

use meterbind_catalog::{enabled_metric_sets, MetricSet, ThreadingMetrics};
use meterbind_core::{MeterBindConfig, ResourceName, TagSet};
use meterbind_simple::{AttributeMap, InMemoryDirectory, SimpleRegistry};

fn threading_resource() -> Arc<AttributeMap> {
    Arc::new(
        AttributeMap::new()
            .with("DaemonThreadCount", 4_i64)
            .with("PeakThreadCount", 12_i64)
            .with("ThreadCount", 10_i64)
            .with("TotalStartedThreadCount", 57_i64),
    )
}

#[test]
fn binds_thread_counts_without_tags() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory
        .register(ResourceName::parse("java.lang:type=Threading").unwrap(), threading_resource())
        .unwrap();

    let registry = Arc::new(SimpleRegistry::new());
    let metrics = ThreadingMetrics::with_options(TagSet::empty(), "java.lang.", directory);
    let report = metrics.bind_to(registry.clone()).unwrap();
    assert_eq!(report.bound, 1);

    let daemon = registry.find("java.lang.daemon-thread-count").unwrap();
    assert!(daemon.tags().is_empty());
    assert_eq!(daemon.value(), 4.0);
    assert_eq!(registry.find("java.lang.peak-thread-count").unwrap().value(), 12.0);
    assert_eq!(registry.find("java.lang.thread-count").unwrap().value(), 10.0);
    assert_eq!(registry.find("java.lang.total-started-thread-count").unwrap().count(), 57.0);
    assert_eq!(registry.len(), 4);
}

#[test]
fn preset_tags_are_attached() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory
        .register(ResourceName::parse("java.lang:type=Threading").unwrap(), threading_resource())
        .unwrap();

    let registry = Arc::new(SimpleRegistry::new());
    ThreadingMetrics::with_options(TagSet::of("host", "h1"), "jvm.", directory)
        .bind_to(registry.clone())
        .unwrap();
    assert_eq!(registry.find("jvm.thread-count").unwrap().tags(), &TagSet::of("host", "h1"));
}

#[test]
fn enabled_sets_follow_config() {
    let directory = Arc::new(InMemoryDirectory::new());
    directory
        .register(ResourceName::parse("java.lang:type=Threading").unwrap(), threading_resource())
        .unwrap();

    let all = enabled_metric_sets(&MeterBindConfig::default(), directory.clone());
    let names: Vec<&str> = all.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["kafka-producer", "kafka-consumer", "threading"]);

    let config = MeterBindConfig::from_toml(
        "[kafka_producer]\nenabled = false\n[kafka_consumer]\nenabled = false\n",
    )
    .unwrap();
    let sets = enabled_metric_sets(&config, directory.clone());
    assert_eq!(sets.len(), 1);

    let registry = Arc::new(SimpleRegistry::new());
    for set in &sets {
        set.bind_to(registry.clone()).unwrap();
    }
    assert_eq!(registry.len(), 4);

    for set in &sets {
        set.close();
    }
    drop(all);
    assert_eq!(directory.subscriber_count(), 0);
}
