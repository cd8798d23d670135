//! JVM threading metrics from the `java.lang:type=Threading` resource.

use std::sync::Arc;

use meterbind_core::config::defaults::DEFAULT_THREADING_PREFIX;
use meterbind_core::errors::BindReport;
use meterbind_core::{
    BindError, MeterBindConfig, MetricsRegistry, NoTags, ResourceDirectory, TagSet,
};

use crate::binder::CatalogBinder;
use crate::metric_set::MetricSet;
use crate::table::{counter, gauge, MeterDef};

const DOMAIN: &str = "java.lang";
const TYPE_NAME: &str = "Threading";

const THREADING_METRICS: &[MeterDef] = &[
    gauge(
        "DaemonThreadCount",
        "daemon-thread-count",
        "DaemonThreadCount",
    ),
    gauge("PeakThreadCount", "peak-thread-count", "PeakThreadCount"),
    gauge("ThreadCount", "thread-count", "ThreadCount"),
    counter(
        "TotalStartedThreadCount",
        "total-started-thread-count",
        "TotalStartedThreadCount",
    ),
];

/// Thread counts. The resource is a singleton, so no tags are extracted.
pub struct ThreadingMetrics {
    binder: CatalogBinder,
}

impl ThreadingMetrics {
    pub fn new(directory: Arc<dyn ResourceDirectory>) -> Self {
        Self::with_options(TagSet::empty(), DEFAULT_THREADING_PREFIX, directory)
    }

    pub fn with_options(
        tags: TagSet,
        meter_name_prefix: &str,
        directory: Arc<dyn ResourceDirectory>,
    ) -> Self {
        Self {
            binder: CatalogBinder::new(DOMAIN, NoTags, tags, meter_name_prefix, directory),
        }
    }

    pub fn from_config(
        config: &MeterBindConfig,
        directory: Arc<dyn ResourceDirectory>,
    ) -> Option<Self> {
        if !config.threading.effective_enabled() {
            return None;
        }
        Some(Self {
            binder: CatalogBinder::from_config(
                DOMAIN,
                NoTags,
                &config.binder,
                &config.threading,
                DEFAULT_THREADING_PREFIX,
                directory,
            ),
        })
    }

    pub fn meter_name_prefix(&self) -> &str {
        self.binder.prefix()
    }
}

impl MetricSet for ThreadingMetrics {
    fn name(&self) -> &'static str {
        "threading"
    }

    fn bind_to(&self, registry: Arc<dyn MetricsRegistry>) -> Result<BindReport, BindError> {
        self.binder.bind_tables(&registry, TYPE_NAME, &[THREADING_METRICS])
    }

    fn close(&self) {
        self.binder.close();
    }
}
