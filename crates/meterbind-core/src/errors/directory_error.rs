//! Resource directory errors.

use super::error_code::{self, MeterBindErrorCode};
use crate::traits::SubscriptionId;

/// Errors reported by a [`ResourceDirectory`](crate::traits::ResourceDirectory).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DirectoryError {
    #[error("resource not found: {name}")]
    InstanceNotFound { name: String },

    #[error("resource already registered: {name}")]
    InstanceAlreadyExists { name: String },

    #[error("attribute {attribute} not found on {name}")]
    AttributeNotFound { name: String, attribute: String },

    #[error("attribute {attribute} is not numeric (found {found})")]
    TypeMismatch { attribute: String, found: String },

    #[error("listener {0} not found")]
    ListenerNotFound(SubscriptionId),

    #[error("resource directory unavailable: {reason}")]
    Unavailable { reason: String },
}

impl DirectoryError {
    /// Whether this is the "already gone" condition that revocation treats as success.
    pub fn is_listener_not_found(&self) -> bool {
        matches!(self, Self::ListenerNotFound(_))
    }
}

impl MeterBindErrorCode for DirectoryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InstanceNotFound { .. } => error_code::INSTANCE_NOT_FOUND,
            Self::AttributeNotFound { .. } => error_code::ATTRIBUTE_NOT_FOUND,
            Self::TypeMismatch { .. } => error_code::TYPE_MISMATCH,
            Self::ListenerNotFound(_) => error_code::LISTENER_NOT_FOUND,
            Self::InstanceAlreadyExists { .. } | Self::Unavailable { .. } => {
                error_code::DIRECTORY_ERROR
            }
        }
    }
}
