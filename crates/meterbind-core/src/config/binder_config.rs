//! Binding engine configuration.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::TagSet;

/// Settings shared by every binding engine built from this config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BinderConfig {
    /// Abort a discovery pass on the first callback error. Default: false.
    pub fail_fast: Option<bool>,
    /// Tags attached to every meter, ahead of the extracted tags.
    pub tags: TagSet,
}

impl BinderConfig {
    /// Returns whether discovery aborts on the first callback error.
    pub fn effective_fail_fast(&self) -> bool {
        self.fail_fast.unwrap_or(defaults::DEFAULT_FAIL_FAST)
    }
}
