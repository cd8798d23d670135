//! Metrics registry errors.

use super::error_code::{self, MeterBindErrorCode};

/// Errors reported by a [`MetricsRegistry`](crate::traits::MetricsRegistry).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid meter name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("meter {name} already registered as a {existing}")]
    KindConflict { name: String, existing: String },
}

impl MeterBindErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } => error_code::INVALID_METER_NAME,
            Self::KindConflict { .. } => error_code::METER_CONFLICT,
        }
    }
}
