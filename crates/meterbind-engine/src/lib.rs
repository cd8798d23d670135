//! # meterbind-engine
//!
//! Binds numeric attributes of directory resources to registry meters.
//!
//! [`BindingEngine`] discovers the resources of one type, subscribes to
//! registrations of new ones, and hands each resource to a caller callback
//! as a [`BindingContext`]. Meters registered through a context remove
//! themselves from the registry the first time their attribute cannot be read.

mod accessor;
pub mod context;
pub mod engine;
pub mod stats;
mod subscription;

pub use context::BindingContext;
pub use engine::{BindingCallback, BindingEngine, BindingEngineBuilder};
pub use stats::BinderStats;
