//! Binding counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals for one engine, across discovery and notification delivery.
#[derive(Debug, Default)]
pub struct BinderStats {
    resources_bound: AtomicU64,
    callback_failures: AtomicU64,
}

impl BinderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resources whose callback completed without error.
    pub fn resources_bound(&self) -> u64 {
        self.resources_bound.load(Ordering::Relaxed)
    }

    /// Callbacks that returned an error or panicked.
    pub fn callback_failures(&self) -> u64 {
        self.callback_failures.load(Ordering::Relaxed)
    }

    pub(crate) fn record_bound(&self) {
        self.resources_bound.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.callback_failures.fetch_add(1, Ordering::Relaxed);
    }
}
