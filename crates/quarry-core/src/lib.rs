//! # Quarry Core
//!
//! Shared vocabulary for the quarry query-construction crates.
//!
//! - [`exception`]: configuration and query errors
//! - [`value`]: tagged scalar values carried by criteria
//! - [`pagination`]: the paging request attached to a query
//! - [`settings`]: TOML-backed settings for query construction
//!
//! Nothing in this crate knows about queries or entities; it only provides
//! the types the other crates agree on.

#![warn(missing_docs)]

pub mod exception;
pub mod pagination;
pub mod settings;
pub mod value;

pub use exception::{ConfigurationError, QueryError, QueryResult};
pub use pagination::PagingFilter;
pub use settings::{CompositeExclusion, IdentitySettings, PagingSettings, QuerySettings};
pub use value::{FieldValue, ValueKind};
