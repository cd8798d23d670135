//! Engine plus meter-name prefix, shared by every catalog.

use std::sync::Arc;

use meterbind_core::config::{BinderConfig, CatalogConfig};
use meterbind_core::errors::{BindReport, MeterBindErrorCode};
use meterbind_core::{BindError, MetricsRegistry, ResourceDirectory, TagExtractor, TagSet};
use meterbind_engine::{BindingContext, BindingEngine};

use crate::table::{bind_tables, MeterDef};

pub(crate) struct CatalogBinder {
    engine: BindingEngine,
    prefix: Arc<str>,
}

impl CatalogBinder {
    pub fn new<E>(
        domain: &str,
        extractor: E,
        tags: TagSet,
        prefix: &str,
        directory: Arc<dyn ResourceDirectory>,
    ) -> Self
    where
        E: TagExtractor + 'static,
    {
        Self {
            engine: BindingEngine::builder(domain)
                .tags(tags)
                .extractor(extractor)
                .build(directory),
            prefix: Arc::from(prefix),
        }
    }

    /// Binder whose tags are the binder-wide tags followed by the catalog's own.
    pub fn from_config<E>(
        domain: &str,
        extractor: E,
        binder: &BinderConfig,
        catalog: &CatalogConfig,
        default_prefix: &str,
        directory: Arc<dyn ResourceDirectory>,
    ) -> Self
    where
        E: TagExtractor + 'static,
    {
        Self {
            engine: BindingEngine::builder(domain)
                .tags(catalog.tags.clone())
                .extractor(extractor)
                .config(binder)
                .build(directory),
            prefix: Arc::from(catalog.effective_prefix(default_prefix)),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn bind_tables(
        &self,
        registry: &Arc<dyn MetricsRegistry>,
        type_name: &str,
        tables: &'static [&'static [MeterDef]],
    ) -> Result<BindReport, BindError> {
        self.bind_with(registry, type_name, move |ctx, prefix| bind_tables(ctx, prefix, tables))
    }

    pub fn bind_with<F>(
        &self,
        registry: &Arc<dyn MetricsRegistry>,
        type_name: &str,
        bind: F,
    ) -> Result<BindReport, BindError>
    where
        F: Fn(&BindingContext, &str) -> Result<(), BindError> + Send + Sync + 'static,
    {
        let prefix = Arc::clone(&self.prefix);
        self.engine
            .bind_metrics_for_type(Arc::clone(registry), type_name, move |ctx| bind(ctx, &prefix))
    }

    pub fn close(&self) {
        self.engine.close();
    }
}

/// Folds one type's outcome into `report`. When a type fails, the types
/// bound before it keep their subscriptions; their partial report is logged
/// before the error is returned.
pub(crate) fn merge_step(
    set: &str,
    report: &mut BindReport,
    step: Result<BindReport, BindError>,
) -> Result<(), BindError> {
    match step {
        Ok(partial) => {
            report.merge(partial);
            Ok(())
        }
        Err(e) => {
            if report.bound > 0 || !report.is_clean() {
                tracing::warn!(
                    set,
                    bound = report.bound,
                    errors = report.error_count(),
                    error_code = e.error_code(),
                    error = %e,
                    "metric set partially bound before failing"
                );
            }
            Err(e)
        }
    }
}
