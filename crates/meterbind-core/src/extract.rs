//! Tag extraction: resource name → tag set.
//!
//! Extractors are total and side-effect free. A key property that is absent
//! from the name is simply skipped.

use crate::{ResourceName, Tag, TagSet};

/// Derives the tags for one resource from its name.
pub trait TagExtractor: Send + Sync {
    fn extract(&self, name: &ResourceName) -> TagSet;
}

impl<F> TagExtractor for F
where
    F: Fn(&ResourceName) -> TagSet + Send + Sync,
{
    fn extract(&self, name: &ResourceName) -> TagSet {
        self(name)
    }
}

/// Extractor that never produces tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTags;

impl TagExtractor for NoTags {
    fn extract(&self, _name: &ResourceName) -> TagSet {
        TagSet::empty()
    }
}

/// Maps selected key properties to tags, in declaration order.
///
/// ```
/// use meterbind_core::{KeyPropertyExtractor, ResourceName, TagExtractor};
///
/// let extractor = KeyPropertyExtractor::new()
///     .with("client-id", "client.id")
///     .with_same("topic");
/// let name =
///     ResourceName::parse("kafka.producer:type=producer-topic-metrics,client-id=c1,topic=t1")
///         .unwrap();
/// assert_eq!(extractor.extract(&name).keys(), vec!["client.id", "topic"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyPropertyExtractor {
    mappings: Vec<(String, String)>,
}

impl KeyPropertyExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit `property` under the tag key `tag_key`.
    pub fn with(mut self, property: impl Into<String>, tag_key: impl Into<String>) -> Self {
        self.mappings.push((property.into(), tag_key.into()));
        self
    }

    /// Emit `property` under its own name.
    pub fn with_same(self, property: impl Into<String>) -> Self {
        let property = property.into();
        self.with(property.clone(), property)
    }
}

impl TagExtractor for KeyPropertyExtractor {
    fn extract(&self, name: &ResourceName) -> TagSet {
        self.mappings
            .iter()
            .filter_map(|(property, tag_key)| {
                name.key_property(property)
                    .map(|value| Tag::new(tag_key.clone(), value))
            })
            .collect()
    }
}
