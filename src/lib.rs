//! # Quarry
//!
//! Entity query construction for Rust.
//!
//! Quarry builds backend-neutral filter trees: callers compose criteria and
//! sub-queries, bind queries to entities through query models, and turn sets
//! of entity instances into primary key conditions. Translating a query into
//! SQL or any other dialect is left to the consumer.
//!
//! ## Crates
//!
//! - [`core`]: values, errors, paging and TOML settings (`quarry-core`)
//! - [`model`]: entities, metadata providers and query models (`quarry-model`)
//! - [`query`]: criteria, queries, predicates and the factory (`quarry-query`)
//!
//! ## Quick Example
//!
//! ```rust
//! use quarry::prelude::*;
//!
//! struct Post {
//!     id: i64,
//! }
//!
//! impl Entity for Post {
//!     fn primary_key_fields() -> &'static [&'static str] {
//!         &["id"]
//!     }
//!
//!     fn field_value(&self, field: &str) -> Option<FieldValue> {
//!         (field == "id").then(|| self.id.into())
//!     }
//! }
//!
//! quarry::model::EntityRegistry::global().register::<Post>();
//!
//! let posts = [Post { id: 1 }, Post { id: 2 }];
//! let mut published = Query::new();
//! published.not_null("published_at");
//!
//! let query = QueryFactory::global()
//!     .append_identity_condition(&posts, Some(published), false)
//!     .unwrap();
//! assert_eq!(query.to_string(), "published_at IS NOT NULL AND id IN [1, 2]");
//! ```

pub mod core;
pub mod model;
pub mod query;

pub use quarry_core::{
	ConfigurationError, FieldValue, PagingFilter, QueryError, QueryResult, QuerySettings,
};
pub use quarry_model::{
	Entity, EntityRegistry, EntityType, MetadataProvider, QueryModel, QueryModelRegistry,
};
pub use quarry_query::{Criteria, CriteriaOperator, Field, Predicate, Query, QueryFactory};

/// Re-exports for building queries.
pub mod prelude {
	pub use quarry_query::prelude::*;

	pub use quarry_core::{CompositeExclusion, QuerySettings};
}

#[cfg(test)]
mod tests {
	use super::prelude::*;
	use rstest::rstest;

	#[rstest]
	fn test_prelude_builds_queries() {
		let mut query = Query::new();
		query
			.and("score", CriteriaOperator::GreaterThan, 10)
			.or_query(Query::new());
		assert_eq!(query.to_string(), "score > 10 OR ()");
	}

	#[rstest]
	fn test_model_registries_reexported() {
		let entities = crate::model::EntityRegistry::new();
		let models = crate::QueryModelRegistry::new();
		assert!(entities.is_empty());
		assert!(models.is_empty());
	}

	#[rstest]
	fn test_settings_reexported() {
		let settings =
			QuerySettings::default().with_composite_exclusion(CompositeExclusion::NoMatchingTuple);
		assert_eq!(
			settings.identity.composite_exclusion,
			CompositeExclusion::NoMatchingTuple
		);
	}
}
