//! Binding errors and non-fatal error collection.

use super::error_code::{self, MeterBindErrorCode};
use super::{DirectoryError, NameError, RegistryError};

/// Errors that can occur while binding resources to meters.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BindError {
    #[error("Invalid resource pattern: {0}")]
    Pattern(#[from] NameError),

    #[error("Meter registration failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("Failed to query resources of type {type_name}: {source}")]
    Discovery {
        type_name: String,
        #[source]
        source: DirectoryError,
    },

    #[error("Failed to subscribe to registrations of type {type_name}: {source}")]
    Subscribe {
        type_name: String,
        #[source]
        source: DirectoryError,
    },

    #[error("Binding callback failed for {resource}: {source}")]
    Callback {
        resource: String,
        #[source]
        source: Box<BindError>,
    },

    #[error("Binder for domain {domain} is closed")]
    Closed { domain: String },
}

impl BindError {
    /// Wrap a callback failure with the resource it was invoked for.
    pub fn callback(resource: impl Into<String>, source: BindError) -> Self {
        Self::Callback {
            resource: resource.into(),
            source: Box::new(source),
        }
    }
}

impl MeterBindErrorCode for BindError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Pattern(e) => e.error_code(),
            Self::Registry(e) => e.error_code(),
            Self::Discovery { source, .. } | Self::Subscribe { source, .. } => source.error_code(),
            Self::Callback { .. } => error_code::CALLBACK_FAILED,
            Self::Closed { .. } => error_code::BINDER_CLOSED,
        }
    }
}

/// Outcome of one `bind_metrics_for_type` call.
/// Carries the number of resources bound during discovery and the
/// callback failures that were skipped rather than aborting the pass.
#[derive(Debug, Default)]
pub struct BindReport {
    /// Resources whose callback completed during discovery.
    pub bound: usize,
    /// Non-fatal callback errors collected during discovery.
    pub errors: Vec<BindError>,
}

impl BindReport {
    /// Create a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-fatal error to the report.
    pub fn add_error(&mut self, error: BindError) {
        self.errors.push(error);
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: BindReport) {
        self.bound += other.bound;
        self.errors.extend(other.errors);
    }

    /// Returns true if there are no non-fatal errors.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of non-fatal errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
