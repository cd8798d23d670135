//! Error handling for meterbind.
//! One error enum per subsystem, `thiserror` only.

pub mod bind_error;
pub mod config_error;
pub mod directory_error;
pub mod error_code;
pub mod name_error;
pub mod registry_error;

pub use bind_error::{BindError, BindReport};
pub use config_error::ConfigError;
pub use directory_error::DirectoryError;
pub use error_code::MeterBindErrorCode;
pub use name_error::NameError;
pub use registry_error::RegistryError;
