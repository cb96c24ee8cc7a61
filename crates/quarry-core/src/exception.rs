//! Error types for query construction.
//!
//! Configuration errors describe static setup defects (an entity without
//! primary keys, a query model without an entity binding). They are never
//! retried; the caller is expected to fix the model definitions.

use thiserror::Error;

use crate::value::ValueKind;

/// Static setup defects discovered while building a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// The entity declares no primary key fields.
	#[error("Entity `{entity}` has no primary keys configured")]
	MissingPrimaryKeys {
		/// Diagnostic name of the entity.
		entity: String,
	},

	/// The query model is not bound to any entity.
	#[error("Query model `{model}` is not bound to any entity")]
	UnboundQueryModel {
		/// Diagnostic name of the query model.
		model: String,
	},

	/// A query bound to one entity was used to filter instances of another.
	#[error("Query is bound to entity `{found}` but instances of `{expected}` were supplied")]
	EntityMismatch {
		/// Entity of the supplied instances.
		expected: String,
		/// Entity the query is bound to.
		found: String,
	},

	/// A declared primary key field cannot be read from an instance.
	#[error("Primary key field `{field}` cannot be read from entity `{entity}`")]
	UnreadableKey {
		/// Diagnostic name of the entity.
		entity: String,
		/// Key field that could not be read.
		field: String,
	},

	/// Key values of one field do not share a scalar type across instances.
	#[error(
		"Primary key field `{field}` of entity `{entity}` mixes value types: expected {expected}, found {found}"
	)]
	MixedKeyTypes {
		/// Diagnostic name of the entity.
		entity: String,
		/// Key field with inconsistent values.
		field: String,
		/// Kind of the first non-null value.
		expected: ValueKind,
		/// Kind of the offending value.
		found: ValueKind,
	},
}

/// Errors surfaced by the query construction layer.
#[derive(Debug, Error)]
pub enum QueryError {
	/// Static configuration defect.
	#[error("Configuration error: {0}")]
	Configuration(#[from] ConfigurationError),

	/// Settings failed validation.
	#[error("Settings error: {0}")]
	Settings(String),

	/// Settings file could not be read.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Settings file is not valid TOML for [`QuerySettings`](crate::QuerySettings).
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),
}

impl QueryError {
	/// Returns true when the error is a configuration defect.
	pub fn is_configuration(&self) -> bool {
		matches!(self, QueryError::Configuration(_))
	}

	/// Returns the configuration defect, if this is one.
	pub fn as_configuration(&self) -> Option<&ConfigurationError> {
		match self {
			QueryError::Configuration(error) => Some(error),
			_ => None,
		}
	}
}

/// Result type alias for query construction.
pub type QueryResult<T> = Result<T, QueryError>;
