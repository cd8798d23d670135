//! # meterbind-core
//!
//! Foundation crate for the meterbind binding engine.
//! Defines tags, resource names, attribute values, errors, config, the
//! directory/registry traits, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod errors;
pub mod extract;
pub mod name;
pub mod tags;
pub mod time_unit;
pub mod tracing;
pub mod traits;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use config::MeterBindConfig;
pub use errors::{BindError, DirectoryError, NameError, RegistryError};
pub use extract::{KeyPropertyExtractor, NoTags, TagExtractor};
pub use name::{ResourceName, ResourcePattern};
pub use tags::{Tag, TagSet};
pub use time_unit::TimeUnit;
pub use traits::{MeterHandle, MeterId, MetricsRegistry, ResourceDirectory, SubscriptionId};
pub use value::AttributeValue;
