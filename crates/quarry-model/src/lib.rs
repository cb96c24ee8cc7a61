//! Entity metadata and query-model binding for quarry.
//!
//! - [`Entity`] / [`EntityType`]: record types with declared primary keys
//! - [`MetadataProvider`] / [`EntityRegistry`]: primary key lookups by entity type
//! - [`QueryModel`] / [`QueryModelRegistry`]: logical query models bound to entities
//!
//! Both registries have a process-wide instance (`global()`) for application
//! code and can be constructed directly for isolated use in tests.

#![warn(missing_docs)]

pub mod entity;
pub mod metadata;
pub mod registry;

pub use entity::{Entity, EntityInstance, EntityType};
pub use metadata::{EntityMetadata, EntityRegistry, MetadataProvider};
pub use registry::{ModelType, QueryModel, QueryModelRegistry};
