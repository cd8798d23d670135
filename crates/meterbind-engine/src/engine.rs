//! BindingEngine: discovery of existing resources plus live binding of new ones.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use meterbind_core::config::BinderConfig;
use meterbind_core::errors::{BindReport, MeterBindErrorCode};
use meterbind_core::traits::{DirectoryEvent, EventFilter, EventListener};
use meterbind_core::{
    BindError, MetricsRegistry, NoTags, ResourceDirectory, ResourceName, ResourcePattern,
    TagExtractor, TagSet,
};

use crate::context::BindingContext;
use crate::stats::BinderStats;
use crate::subscription::{BindingSubscription, SubscriptionSet};

/// Caller-supplied binding logic, invoked once per matching resource.
pub type BindingCallback = Arc<dyn Fn(&BindingContext) -> Result<(), BindError> + Send + Sync>;

/// State shared between the engine and the listeners it installs.
struct Binder {
    domain: String,
    preset: TagSet,
    extractor: Arc<dyn TagExtractor>,
    stats: BinderStats,
    subscriptions: SubscriptionSet,
}

impl Binder {
    fn bind_resource(
        &self,
        directory: &Arc<dyn ResourceDirectory>,
        registry: &Arc<dyn MetricsRegistry>,
        name: &ResourceName,
        callback: &BindingCallback,
    ) -> Result<(), BindError> {
        let tags = TagSet::concat(&self.preset, &self.extractor.extract(name));
        let ctx = BindingContext::new(
            Arc::clone(directory),
            Arc::clone(registry),
            name.clone(),
            tags,
        );
        match callback(&ctx) {
            Ok(()) => {
                self.stats.record_bound();
                Ok(())
            }
            Err(source) => {
                self.stats.record_failure();
                Err(BindError::callback(name.to_string(), source))
            }
        }
    }

    fn on_registration(
        &self,
        directory: &Weak<dyn ResourceDirectory>,
        registry: &Arc<dyn MetricsRegistry>,
        type_name: &str,
        name: &ResourceName,
        callback: &BindingCallback,
    ) {
        if self.subscriptions.is_closed() {
            return;
        }
        let Some(directory) = directory.upgrade() else {
            return;
        };
        let _span = tracing::debug_span!(
            "meterbind.notification",
            domain = %self.domain,
            type_name,
            resource = %name,
        )
        .entered();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.bind_resource(&directory, registry, name, callback)
        }));
        match outcome {
            Ok(Ok(())) => tracing::debug!("registered resource bound"),
            Ok(Err(e)) => tracing::error!(
                error_code = e.error_code(),
                error = %e,
                "binding callback failed for registered resource"
            ),
            Err(_panic) => {
                self.stats.record_failure();
                tracing::error!("binding callback panicked for registered resource");
            }
        }
    }
}

/// Binds every resource of a domain and type, now and as they appear.
///
/// Each call to [`bind_metrics_for_type`](Self::bind_metrics_for_type)
/// leaves a registration listener behind. [`close`](Self::close) revokes
/// them all; dropping the engine closes it.
pub struct BindingEngine {
    binder: Arc<Binder>,
    directory: Arc<dyn ResourceDirectory>,
    fail_fast: bool,
}

impl BindingEngine {
    /// Engine with no preset tags that does not abort discovery on callback errors.
    pub fn new<E>(
        domain: impl Into<String>,
        extractor: E,
        directory: Arc<dyn ResourceDirectory>,
    ) -> Self
    where
        E: TagExtractor + 'static,
    {
        Self::builder(domain).extractor(extractor).build(directory)
    }

    pub fn builder(domain: impl Into<String>) -> BindingEngineBuilder {
        BindingEngineBuilder::new(domain)
    }

    pub fn domain(&self) -> &str {
        &self.binder.domain
    }

    /// Bind all resources `domain:type=<type_name>,*`, then keep binding new
    /// ones as the directory registers them.
    ///
    /// Callback errors during discovery are collected in the returned report,
    /// or returned immediately when the engine is fail-fast. Errors querying
    /// or subscribing to the directory are always returned.
    pub fn bind_metrics_for_type<F>(
        &self,
        registry: Arc<dyn MetricsRegistry>,
        type_name: &str,
        callback: F,
    ) -> Result<BindReport, BindError>
    where
        F: Fn(&BindingContext) -> Result<(), BindError> + Send + Sync + 'static,
    {
        if self.binder.subscriptions.is_closed() {
            return Err(self.closed_error());
        }
        let pattern = ResourcePattern::for_type(&self.binder.domain, type_name)?;
        let callback: BindingCallback = Arc::new(callback);

        let report = self.bind_existing(&registry, &pattern, type_name, &callback)?;
        self.bind_future(registry, type_name, callback)?;
        Ok(report)
    }

    /// Revoke every subscription this engine installed. Safe to call repeatedly.
    pub fn close(&self) {
        for subscription in self.binder.subscriptions.drain() {
            self.revoke(&subscription);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.binder.subscriptions.is_closed()
    }

    /// Number of registration listeners currently installed.
    pub fn subscription_count(&self) -> usize {
        self.binder.subscriptions.len()
    }

    pub fn stats(&self) -> &BinderStats {
        &self.binder.stats
    }

    fn bind_existing(
        &self,
        registry: &Arc<dyn MetricsRegistry>,
        pattern: &ResourcePattern,
        type_name: &str,
        callback: &BindingCallback,
    ) -> Result<BindReport, BindError> {
        let _span = tracing::info_span!(
            "meterbind.discovery",
            domain = %self.binder.domain,
            type_name,
        )
        .entered();

        let names = self
            .directory
            .query_names(pattern)
            .map_err(|source| BindError::Discovery {
                type_name: type_name.to_string(),
                source,
            })?;

        let mut report = BindReport::new();
        for name in &names {
            match self.binder.bind_resource(&self.directory, registry, name, callback) {
                Ok(()) => report.bound += 1,
                Err(e) if self.fail_fast => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        resource = %name,
                        error_code = e.error_code(),
                        error = %e,
                        "skipping resource after binding callback failed"
                    );
                    report.add_error(e);
                }
            }
        }

        tracing::debug!(
            matched = names.len(),
            bound = report.bound,
            failed = report.error_count(),
            "discovery complete"
        );
        Ok(report)
    }

    fn bind_future(
        &self,
        registry: Arc<dyn MetricsRegistry>,
        type_name: &str,
        callback: BindingCallback,
    ) -> Result<(), BindError> {
        let filter: EventFilter = {
            let domain = self.binder.domain.clone();
            let wanted = type_name.to_string();
            Arc::new(move |event: &DirectoryEvent| {
                event.is_registration()
                    && event.name().domain() == domain
                    && event.name().key_property("type") == Some(wanted.as_str())
            })
        };

        let listener: EventListener = {
            let binder = Arc::clone(&self.binder);
            let directory = Arc::downgrade(&self.directory);
            let type_name = type_name.to_string();
            Arc::new(move |event: &DirectoryEvent| {
                binder.on_registration(&directory, &registry, &type_name, event.name(), &callback);
            })
        };

        let id = self
            .directory
            .subscribe(filter, listener)
            .map_err(|source| BindError::Subscribe {
                type_name: type_name.to_string(),
                source,
            })?;

        let subscription = BindingSubscription {
            id,
            type_name: type_name.to_string(),
        };
        if let Err(orphan) = self.binder.subscriptions.record(subscription) {
            self.revoke(&orphan);
            return Err(self.closed_error());
        }
        tracing::debug!(
            domain = %self.binder.domain,
            type_name,
            subscription = %id,
            "listening for registrations"
        );
        Ok(())
    }

    fn revoke(&self, subscription: &BindingSubscription) {
        match self.directory.unsubscribe(subscription.id) {
            Ok(()) => {}
            Err(e) if e.is_listener_not_found() => {
                tracing::debug!(subscription = %subscription.id, "listener already removed");
            }
            Err(e) => tracing::warn!(
                domain = %self.binder.domain,
                type_name = %subscription.type_name,
                subscription = %subscription.id,
                error_code = e.error_code(),
                error = %e,
                "failed to revoke registration listener"
            ),
        }
    }

    fn closed_error(&self) -> BindError {
        BindError::Closed {
            domain: self.binder.domain.clone(),
        }
    }
}

impl Drop for BindingEngine {
    fn drop(&mut self) {
        self.close();
    }
}

/// Builder for [`BindingEngine`].
pub struct BindingEngineBuilder {
    domain: String,
    tags: TagSet,
    extractor: Arc<dyn TagExtractor>,
    fail_fast: bool,
}

impl BindingEngineBuilder {
    fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            tags: TagSet::empty(),
            extractor: Arc::new(NoTags),
            fail_fast: false,
        }
    }

    /// Preset tags, placed ahead of the extracted tags on every meter.
    pub fn tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn extractor<E>(mut self, extractor: E) -> Self
    where
        E: TagExtractor + 'static,
    {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Take fail-fast from `config` and prepend its tags to the preset tags.
    pub fn config(mut self, config: &BinderConfig) -> Self {
        self.fail_fast = config.effective_fail_fast();
        self.tags = TagSet::concat(&config.tags, &self.tags);
        self
    }

    pub fn build(self, directory: Arc<dyn ResourceDirectory>) -> BindingEngine {
        BindingEngine {
            binder: Arc::new(Binder {
                domain: self.domain,
                preset: self.tags,
                extractor: self.extractor,
                stats: BinderStats::new(),
                subscriptions: SubscriptionSet::new(),
            }),
            directory,
            fail_fast: self.fail_fast,
        }
    }
}
