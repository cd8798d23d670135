//! Tests for tag sets and tag extraction.

use meterbind_core::{KeyPropertyExtractor, NoTags, ResourceName, Tag, TagExtractor, TagSet};

fn two_tags() -> TagSet {
    TagSet::of("tag1", "value1").and("tag2", "value2")
}

#[test]
fn has_keys_requires_every_key() {
    let tags = two_tags();

    assert!(tags.has_keys::<&str>(&[]));
    assert!(tags.has_keys(&["tag1"]));
    assert!(tags.has_keys(&["tag1", "tag2"]));
    assert!(tags.has_keys(&["tag2", "tag1"]));

    assert!(!tags.has_keys(&["tag1", "tag2", "tag3"]));
    assert!(!TagSet::empty().has_keys(&["tag1"]));
}

#[test]
fn keys_are_returned_in_insertion_order() {
    assert_eq!(two_tags().keys(), vec!["tag1", "tag2"]);
    assert!(TagSet::empty().keys().is_empty());
}

#[test]
fn concat_puts_preset_first_and_keeps_duplicates() {
    let preset = TagSet::of("env", "prod").and("topic", "preset");
    let extracted = TagSet::of("topic", "orders").and("partition", "3");

    let merged = TagSet::concat(&preset, &extracted);

    assert_eq!(merged.keys(), vec!["env", "topic", "topic", "partition"]);
    assert_eq!(merged.get("topic"), Some("preset"));
    assert_eq!(merged.len(), 4);
}

#[test]
fn concat_with_empty_sides() {
    let tags = two_tags();
    assert_eq!(TagSet::concat(&TagSet::empty(), &tags), tags);
    assert_eq!(TagSet::concat(&tags, &TagSet::empty()), tags);
    assert!(TagSet::concat(&TagSet::empty(), &TagSet::empty()).is_empty());
}

#[test]
fn tag_set_collects_from_pairs_and_displays() {
    let tags: TagSet = vec![("a", "1"), ("b", "2")].into_iter().collect();
    assert_eq!(tags.to_string(), "{a=1,b=2}");
    assert_eq!(tags.iter().next(), Some(&Tag::new("a", "1")));
}

#[test]
fn key_property_extractor_skips_absent_properties() {
    let extractor = KeyPropertyExtractor::new()
        .with("client-id", "client.id")
        .with_same("topic")
        .with_same("partition")
        .with_same("node");

    let name = ResourceName::parse(
        "kafka.consumer:type=consumer-fetch-manager-metrics,client-id=c1,partition=0,topic=orders",
    )
    .unwrap();
    let tags = extractor.extract(&name);
    assert_eq!(tags.keys(), vec!["client.id", "topic", "partition"]);
    assert_eq!(tags.get("client.id"), Some("c1"));

    let bare = ResourceName::parse("kafka.consumer:type=consumer-metrics").unwrap();
    assert!(extractor.extract(&bare).is_empty());
}

#[test]
fn closures_and_no_tags_are_extractors() {
    let name = ResourceName::parse("app:type=Cache,name=users").unwrap();

    let by_name = |n: &ResourceName| TagSet::of("cache", n.key_property("name").unwrap_or("?"));
    assert_eq!(by_name.extract(&name).get("cache"), Some("users"));

    assert!(NoTags.extract(&name).is_empty());
}
