//! Cleanup set of directory subscriptions owned by one engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use meterbind_core::SubscriptionId;

/// A live registration listener installed by `bind_metrics_for_type`.
#[derive(Debug, Clone)]
pub(crate) struct BindingSubscription {
    pub id: SubscriptionId,
    pub type_name: String,
}

/// Subscriptions to revoke on close. Once closed, nothing new is accepted.
#[derive(Debug, Default)]
pub(crate) struct SubscriptionSet {
    entries: Mutex<Vec<BindingSubscription>>,
    closed: AtomicBool,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscription. Hands it back if the set is already closed, in
    /// which case the caller owns its revocation.
    pub fn record(&self, subscription: BindingSubscription) -> Result<(), BindingSubscription> {
        let mut entries = self.lock();
        if self.closed.load(Ordering::Acquire) {
            return Err(subscription);
        }
        entries.push(subscription);
        Ok(())
    }

    /// Close the set and take every recorded subscription. Only the first
    /// call gets anything back.
    pub fn drain(&self) -> Vec<BindingSubscription> {
        let mut entries = self.lock();
        if self.closed.swap(true, Ordering::AcqRel) {
            return Vec::new();
        }
        std::mem::take(&mut *entries)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BindingSubscription>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
