//! MeterBindErrorCode trait for structured log fields.

/// Every error enum implements this to expose a stable, machine-readable
/// code. The code is attached as the `error_code` field of log events.
pub trait MeterBindErrorCode {
    /// Returns the error code string (e.g., "DIRECTORY_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const MALFORMED_NAME: &str = "MALFORMED_NAME";
pub const INSTANCE_NOT_FOUND: &str = "INSTANCE_NOT_FOUND";
pub const ATTRIBUTE_NOT_FOUND: &str = "ATTRIBUTE_NOT_FOUND";
pub const TYPE_MISMATCH: &str = "TYPE_MISMATCH";
pub const LISTENER_NOT_FOUND: &str = "LISTENER_NOT_FOUND";
pub const DIRECTORY_ERROR: &str = "DIRECTORY_ERROR";
pub const INVALID_METER_NAME: &str = "INVALID_METER_NAME";
pub const METER_CONFLICT: &str = "METER_CONFLICT";
pub const CALLBACK_FAILED: &str = "CALLBACK_FAILED";
pub const BINDER_CLOSED: &str = "BINDER_CLOSED";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
