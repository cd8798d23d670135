//! Tests for InMemoryDirectory and AttributeMap.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use meterbind_core::traits::{DirectoryEvent, EventFilter, EventListener};
use meterbind_core::{
    AttributeValue, DirectoryError, ResourceDirectory, ResourceName, ResourcePattern,
};
use meterbind_simple::{AttributeMap, InMemoryDirectory};

fn name(s: &str) -> ResourceName {
    ResourceName::parse(s).unwrap()
}

fn empty() -> Arc<AttributeMap> {
    Arc::new(AttributeMap::new())
}

fn accept_all() -> EventFilter {
    Arc::new(|_: &DirectoryEvent| true)
}

#[test]
fn query_matches_domain_and_type() {
    let dir = InMemoryDirectory::new();
    dir.register(name("kafka.producer:type=producer-metrics,client-id=a"), empty()).unwrap();
    dir.register(name("kafka.producer:type=producer-metrics,client-id=b"), empty()).unwrap();
    dir.register(name("kafka.producer:type=producer-topic-metrics,client-id=a,topic=t"), empty())
        .unwrap();
    dir.register(name("kafka.consumer:type=producer-metrics,client-id=a"), empty()).unwrap();

    let pattern = ResourcePattern::for_type("kafka.producer", "producer-metrics").unwrap();
    let mut found: Vec<String> = dir
        .query_names(&pattern)
        .unwrap()
        .iter()
        .map(|n| n.key_property("client-id").unwrap().to_string())
        .collect();
    found.sort();
    assert_eq!(found, vec!["a", "b"]);
}

#[test]
fn duplicate_registration_is_rejected() {
    let dir = InMemoryDirectory::new();
    let n = name("d:type=T");
    dir.register(n.clone(), empty()).unwrap();
    let err = dir.register(n, empty()).unwrap_err();
    assert!(matches!(err, DirectoryError::InstanceAlreadyExists { .. }));
    assert_eq!(dir.resource_count(), 1);
}

#[test]
fn attribute_reads_reflect_live_values() {
    let dir = InMemoryDirectory::new();
    let n = name("d:type=T");
    let attrs = Arc::new(AttributeMap::new().with("Count", 1_i64));
    dir.register(n.clone(), Arc::clone(&attrs)).unwrap();

    assert_eq!(dir.get_attribute(&n, "Count").unwrap(), AttributeValue::Int(1));
    attrs.set("Count", 7_i64);
    assert_eq!(dir.get_attribute(&n, "Count").unwrap(), AttributeValue::Int(7));

    attrs.remove("Count");
    assert!(matches!(
        dir.get_attribute(&n, "Count"),
        Err(DirectoryError::AttributeNotFound { .. })
    ));
}

#[test]
fn reads_after_unregister_fail_with_instance_not_found() {
    let dir = InMemoryDirectory::new();
    let n = name("d:type=T");
    dir.register(n.clone(), Arc::new(AttributeMap::new().with("x", 1.0))).unwrap();
    dir.unregister(&n).unwrap();

    assert!(!dir.is_registered(&n));
    assert!(matches!(
        dir.get_attribute(&n, "x"),
        Err(DirectoryError::InstanceNotFound { .. })
    ));
    assert!(matches!(dir.unregister(&n), Err(DirectoryError::InstanceNotFound { .. })));
}

#[test]
fn listeners_receive_filtered_events_in_order() {
    let dir = InMemoryDirectory::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let listener: EventListener = Arc::new(move |event: &DirectoryEvent| {
        sink.lock().unwrap().push(event.clone());
    });
    let filter: EventFilter = Arc::new(|event: &DirectoryEvent| event.name().domain() == "keep");
    dir.subscribe(filter, listener).unwrap();

    dir.register(name("keep:type=A"), empty()).unwrap();
    dir.register(name("drop:type=A"), empty()).unwrap();
    dir.unregister(&name("keep:type=A")).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            DirectoryEvent::Registered(name("keep:type=A")),
            DirectoryEvent::Unregistered(name("keep:type=A")),
        ]
    );
}

#[test]
fn unsubscribe_stops_delivery_and_reports_missing_listener() {
    let dir = InMemoryDirectory::new();
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    let id = dir
        .subscribe(accept_all(), Arc::new(move |_: &DirectoryEvent| {
            c.fetch_add(1, Ordering::SeqCst);
        }))
        .unwrap();

    dir.register(name("d:type=A"), empty()).unwrap();
    dir.unsubscribe(id).unwrap();
    dir.register(name("d:type=B"), empty()).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    let err = dir.unsubscribe(id).unwrap_err();
    assert!(err.is_listener_not_found());
    assert_eq!(dir.subscriber_count(), 0);
}

#[test]
fn listener_may_call_back_into_the_directory() {
    let dir = Arc::new(InMemoryDirectory::new());
    let read = Arc::new(Mutex::new(None));

    let weak = Arc::downgrade(&dir);
    let slot = Arc::clone(&read);
    dir.subscribe(
        accept_all(),
        Arc::new(move |event: &DirectoryEvent| {
            if let Some(dir) = weak.upgrade() {
                *slot.lock().unwrap() = dir.get_attribute(event.name(), "v").ok();
                dir.subscribe(accept_all(), Arc::new(|_: &DirectoryEvent| {})).unwrap();
            }
        }),
    )
    .unwrap();

    dir.register(name("d:type=A"), Arc::new(AttributeMap::new().with("v", 3_i64))).unwrap();
    assert_eq!(*read.lock().unwrap(), Some(AttributeValue::Int(3)));
    assert_eq!(dir.subscriber_count(), 2);
}

#[test]
fn panicking_listener_does_not_block_others() {
    let dir = InMemoryDirectory::new();
    let count = Arc::new(AtomicUsize::new(0));

    dir.subscribe(accept_all(), Arc::new(|_: &DirectoryEvent| panic!("listener failure")))
        .unwrap();
    let c = Arc::clone(&count);
    dir.subscribe(accept_all(), Arc::new(move |_: &DirectoryEvent| {
        c.fetch_add(1, Ordering::SeqCst);
    }))
    .unwrap();

    dir.register(name("d:type=A"), empty()).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
