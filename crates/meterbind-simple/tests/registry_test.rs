//! Tests for SimpleRegistry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use meterbind_core::traits::MeterKind;
use meterbind_core::{MeterId, MetricsRegistry, RegistryError, TagSet, TimeUnit};
use meterbind_simple::SimpleRegistry;

fn constant(v: f64) -> Arc<dyn Fn() -> f64 + Send + Sync> {
    Arc::new(move || v)
}

#[test]
fn gauge_reports_accessor_value() {
    let registry = SimpleRegistry::new();
    registry
        .register_gauge(MeterId::new("g", TagSet::of("a", "1")), constant(1.0))
        .unwrap();

    let gauge = registry.find("g").unwrap();
    assert_eq!(gauge.kind(), MeterKind::Gauge);
    assert_eq!(gauge.value(), 1.0);
    assert_eq!(gauge.tags(), &TagSet::of("a", "1"));
}

#[test]
fn time_gauge_converts_from_native_unit() {
    let registry = SimpleRegistry::new();
    registry
        .register_time_gauge(MeterId::new("t", TagSet::empty()), TimeUnit::Minutes, constant(1.0))
        .unwrap();

    let t = registry.find("t").unwrap();
    assert_eq!(t.value(), 60.0);
    assert_eq!(t.value_in(TimeUnit::Minutes), 1.0);
    assert_eq!(t.value_in(TimeUnit::Milliseconds), 60_000.0);
}

#[test]
fn function_counter_reads_live() {
    let registry = SimpleRegistry::new();
    let total = Arc::new(AtomicU64::new(0));
    let source = Arc::clone(&total);
    registry
        .register_function_counter(
            MeterId::new("c", TagSet::empty()),
            Arc::new(move || source.load(Ordering::SeqCst) as f64),
        )
        .unwrap();

    let counter = registry.find("c").unwrap();
    assert_eq!(counter.count(), 0.0);
    total.store(5, Ordering::SeqCst);
    assert_eq!(counter.count(), 5.0);
}

#[test]
fn duplicate_id_returns_existing_handle() {
    let registry = SimpleRegistry::new();
    let id = MeterId::new("g", TagSet::of("k", "v"));
    let first = registry.register_gauge(id.clone(), constant(1.0)).unwrap();
    let second = registry
        .register_gauge(id.with_description("other"), constant(2.0))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.find("g").unwrap().value(), 1.0);
}

#[test]
fn same_name_different_tags_are_distinct() {
    let registry = SimpleRegistry::new();
    registry.register_gauge(MeterId::new("g", TagSet::of("k", "a")), constant(1.0)).unwrap();
    registry.register_gauge(MeterId::new("g", TagSet::of("k", "b")), constant(2.0)).unwrap();

    assert_eq!(registry.find_all("g").len(), 2);
    assert_eq!(registry.find_tagged("g", &TagSet::of("k", "b")).unwrap().value(), 2.0);
}

#[test]
fn kind_conflict_is_rejected() {
    let registry = SimpleRegistry::new();
    let id = MeterId::new("m", TagSet::empty());
    registry.register_gauge(id.clone(), constant(1.0)).unwrap();
    let err = registry.register_function_counter(id, constant(1.0)).unwrap_err();
    assert!(matches!(err, RegistryError::KindConflict { .. }));
}

#[test]
fn malformed_names_are_rejected() {
    let registry = SimpleRegistry::new();
    for bad in ["", "has space", ".leading", "trailing."] {
        let err = registry
            .register_gauge(MeterId::new(bad, TagSet::empty()), constant(0.0))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidName { .. }), "{bad:?}");
    }
    assert!(registry.is_empty());
}

#[test]
fn remove_is_reported_once() {
    let registry = SimpleRegistry::new();
    let id = MeterId::new("g", TagSet::empty());
    let handle = registry.register_gauge(id.clone(), constant(1.0)).unwrap();

    assert!(registry.remove(handle));
    assert!(!registry.remove(handle));
    assert!(registry.find("g").is_none());

    let again = registry.register_gauge(id, constant(2.0)).unwrap();
    assert_ne!(again, handle);
}

#[test]
fn accessor_may_remove_its_own_meter() {
    let registry = Arc::new(SimpleRegistry::new());
    let weak = Arc::downgrade(&registry);
    let handle_slot = Arc::new(std::sync::OnceLock::new());
    let slot = Arc::clone(&handle_slot);

    let handle = registry
        .register_gauge(
            MeterId::new("self", TagSet::empty()),
            Arc::new(move || {
                if let (Some(r), Some(h)) = (weak.upgrade(), slot.get()) {
                    r.remove(*h);
                }
                f64::NAN
            }),
        )
        .unwrap();
    handle_slot.set(handle).unwrap();

    assert!(registry.find("self").unwrap().value().is_nan());
    assert!(registry.is_empty());
}

#[test]
fn snapshot_serializes_to_json() {
    let registry = SimpleRegistry::new();
    registry
        .register_gauge(
            MeterId::new("b.gauge", TagSet::of("client.id", "c1")).with_description("a gauge"),
            constant(2.0),
        )
        .unwrap();
    registry
        .register_time_gauge(
            MeterId::new("a.time", TagSet::empty()),
            TimeUnit::Milliseconds,
            constant(1500.0),
        )
        .unwrap();

    let samples = registry.snapshot();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].name, "a.time");
    assert_eq!(samples[0].value, 1.5);

    let json = serde_json::to_value(&samples).unwrap();
    assert_eq!(json[0]["kind"], "time_gauge");
    assert_eq!(json[0]["base_unit"], "seconds");
    assert_eq!(json[1]["tags"][0]["key"], "client.id");
    assert_eq!(json[1]["description"], "a gauge");
    assert!(json[1].get("base_unit").is_none());
}
