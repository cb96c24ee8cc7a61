//! Entity metadata and query-model registries.
//!
//! # Examples
//!
//! ```rust
//! use quarry::model::{EntityRegistry, QueryModelRegistry};
//!
//! assert!(EntityRegistry::new().is_empty());
//! assert!(QueryModelRegistry::new().is_empty());
//! ```

pub use quarry_model::*;
