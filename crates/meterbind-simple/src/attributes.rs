//! Resources held by the in-memory directory.

use dashmap::DashMap;

use meterbind_core::AttributeValue;

/// Anything that can answer attribute reads for the directory.
pub trait Resource: Send + Sync {
    /// Current value of `name`, or `None` if the resource has no such attribute.
    fn attribute(&self, name: &str) -> Option<AttributeValue>;
}

/// Thread-safe bag of named attributes. Values can be changed or removed
/// while the resource is registered.
#[derive(Debug, Default)]
pub struct AttributeMap {
    values: DashMap<String, AttributeValue>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `set`.
    pub fn with(self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&self, name: &str) -> Option<AttributeValue> {
        self.values.remove(name).map(|(_, v)| v)
    }

    pub fn get(&self, name: &str) -> Option<AttributeValue> {
        self.values.get(name).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Resource for AttributeMap {
    fn attribute(&self, name: &str) -> Option<AttributeValue> {
        self.get(name)
    }
}
