//! Ordered key/value tags used to label meters.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single key/value label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered sequence of tags.
///
/// Insertion order is preserved and keys are not de-duplicated: when preset
/// and extracted tags share a key, both are kept in order. A `TagSet` is a
/// plain value; once handed to a registry it is cloned, so later changes to
/// the caller's copy never reach an already registered meter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single-tag set.
    pub fn of(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tags: vec![Tag::new(key, value)],
        }
    }

    /// Order-preserving concatenation. `preset` comes first.
    pub fn concat(preset: &TagSet, extracted: &TagSet) -> TagSet {
        let mut tags = Vec::with_capacity(preset.len() + extracted.len());
        tags.extend(preset.tags.iter().cloned());
        tags.extend(extracted.tags.iter().cloned());
        TagSet { tags }
    }

    /// Append a tag, builder style.
    pub fn and(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Tag::new(key, value));
        self
    }

    pub fn push(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    /// True iff every given key is present. An empty key list is always satisfied.
    pub fn has_keys<K: AsRef<str>>(&self, keys: &[K]) -> bool {
        keys.iter().all(|k| self.contains_key(k.as_ref()))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.tags.iter().any(|t| t.key == key)
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.key.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{tag}")?;
        }
        f.write_str("}")
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().map(|(k, v)| Tag::new(k, v)).collect()
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl IntoIterator for TagSet {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}
