//! Configuration system for meterbind.
//! TOML-based, 3-layer resolution: env > file > defaults.

pub mod binder_config;
pub mod catalog_config;
pub mod defaults;
pub mod meterbind_config;

pub use binder_config::BinderConfig;
pub use catalog_config::CatalogConfig;
pub use meterbind_config::MeterBindConfig;
