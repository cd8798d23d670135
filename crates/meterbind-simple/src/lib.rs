//! # meterbind-simple
//!
//! In-process implementations of the two collaborator traits:
//! [`InMemoryDirectory`] for resources and [`SimpleRegistry`] for meters.
//! Both are backed by `DashMap` and never hold a map guard while running
//! caller code, so listeners and accessors may call back in freely.

pub mod attributes;
pub mod directory;
pub mod registry;

pub use attributes::{AttributeMap, Resource};
pub use directory::InMemoryDirectory;
pub use registry::{MeterSample, RegisteredMeter, SimpleRegistry};
