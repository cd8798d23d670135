//! Per-catalog configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::TagSet;

/// Configuration for one metric catalog (Kafka producer, consumer, threading).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// Bind this catalog at all. Default: true.
    pub enabled: Option<bool>,
    /// Prefix prepended to every meter name. Default depends on the catalog.
    pub meter_name_prefix: Option<String>,
    /// Extra tags, appended after the binder-wide tags.
    pub tags: TagSet,
}

impl CatalogConfig {
    pub fn effective_enabled(&self) -> bool {
        self.enabled.unwrap_or(defaults::DEFAULT_CATALOG_ENABLED)
    }

    /// Configured prefix, or `default` when none is set.
    pub fn effective_prefix<'a>(&'a self, default: &'a str) -> &'a str {
        self.meter_name_prefix.as_deref().unwrap_or(default)
    }
}
