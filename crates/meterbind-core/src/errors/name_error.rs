//! Resource name errors.

use super::error_code::{self, MeterBindErrorCode};

/// Errors raised while parsing resource names and patterns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("malformed resource name {input:?}: {reason}")]
    Malformed { input: String, reason: String },
}

impl NameError {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl MeterBindErrorCode for NameError {
    fn error_code(&self) -> &'static str {
        error_code::MALFORMED_NAME
    }
}
