//! # Quarry Query
//!
//! Criteria trees and the entry points that build them.
//!
//! ## Modules
//!
//! - [`criteria`]: leaf conditions (`field operator operand`)
//! - [`query`]: the composable [`Query`] tree
//! - [`predicate`]: typed predicates over query model fields
//! - [`identity`]: primary key conditions for sets of entity instances
//! - [`factory`]: [`QueryFactory`] and its global shorthands
//!
//! ## Example
//!
//! ```
//! use quarry_core::FieldValue;
//! use quarry_model::{Entity, EntityRegistry, QueryModelRegistry};
//! use quarry_query::QueryFactory;
//! use std::sync::Arc;
//!
//! struct Book {
//!     isbn: String,
//! }
//!
//! impl Entity for Book {
//!     fn primary_key_fields() -> &'static [&'static str] {
//!         &["isbn"]
//!     }
//!
//!     fn field_value(&self, field: &str) -> Option<FieldValue> {
//!         (field == "isbn").then(|| self.isbn.as_str().into())
//!     }
//! }
//!
//! let entities = Arc::new(EntityRegistry::new());
//! entities.register::<Book>();
//! let factory = QueryFactory::new(entities, Arc::new(QueryModelRegistry::new()));
//!
//! let books = [
//!     Book { isbn: "978-0".into() },
//!     Book { isbn: "978-1".into() },
//! ];
//! let query = factory.append_identity_condition(&books, None, true).unwrap();
//! assert_eq!(query.to_string(), "isbn NOT IN ['978-0', '978-1']");
//! ```

pub mod criteria;
pub mod factory;
pub mod identity;
pub mod predicate;
pub mod prelude;
pub mod query;

pub use criteria::{Criteria, CriteriaOperator, CriteriaValue};
pub use factory::{
	QueryFactory, append_identity_condition, append_instance_condition, create_model_query,
	create_model_query_with, create_paged_query, create_query,
};
pub use identity::IdentityConditionBuilder;
pub use predicate::{Field, Predicate};
pub use query::{Connector, CriteriaIter, Query, QueryEntry, QueryItem};
