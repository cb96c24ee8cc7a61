//! Entity definitions.
//!
//! An [`Entity`] is a record type with declared primary key fields. The query
//! layer never sees an entity's full shape; it only asks for key field values
//! by name through [`Entity::field_value`].

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use quarry_core::FieldValue;

/// A record type that can be filtered by identity.
///
/// # Examples
///
/// ```
/// use quarry_core::FieldValue;
/// use quarry_model::Entity;
///
/// struct OrderLine {
///     order_id: i64,
///     line_no: i32,
///     sku: String,
/// }
///
/// impl Entity for OrderLine {
///     fn entity_name() -> &'static str {
///         "shop.OrderLine"
///     }
///
///     fn primary_key_fields() -> &'static [&'static str] {
///         &["order_id", "line_no"]
///     }
///
///     fn field_value(&self, field: &str) -> Option<FieldValue> {
///         match field {
///             "order_id" => Some(self.order_id.into()),
///             "line_no" => Some(self.line_no.into()),
///             "sku" => Some(self.sku.as_str().into()),
///             _ => None,
///         }
///     }
/// }
///
/// assert_eq!(OrderLine::primary_key_fields().len(), 2);
/// ```
pub trait Entity: Send + Sync + 'static {
	/// Diagnostic name used in errors and logs.
	fn entity_name() -> &'static str {
		std::any::type_name::<Self>()
	}

	/// Ordered primary key field names.
	fn primary_key_fields() -> &'static [&'static str];

	/// Reads a field by name. Returns `None` for unknown fields.
	fn field_value(&self, field: &str) -> Option<FieldValue>;
}

/// Object-safe view of an entity instance.
///
/// Implemented for every [`Entity`], so metadata providers can read values
/// without being generic over the entity type.
pub trait EntityInstance {
	/// The entity type this instance belongs to.
	fn entity_type(&self) -> EntityType;

	/// Reads a field by name.
	fn read_field(&self, field: &str) -> Option<FieldValue>;
}

impl<E: Entity> EntityInstance for E {
	fn entity_type(&self) -> EntityType {
		EntityType::of::<E>()
	}

	fn read_field(&self, field: &str) -> Option<FieldValue> {
		Entity::field_value(self, field)
	}
}

/// Opaque entity type descriptor bound to a query.
///
/// Equality and hashing use the Rust type identity only; the name is carried
/// for diagnostics.
#[derive(Clone, Copy)]
pub struct EntityType {
	type_id: TypeId,
	name: &'static str,
}

impl EntityType {
	/// Descriptor for entity `E`.
	pub fn of<E: Entity>() -> Self {
		Self {
			type_id: TypeId::of::<E>(),
			name: E::entity_name(),
		}
	}

	/// Rust type identity of the entity.
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Diagnostic name of the entity.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Returns true when this descriptor names entity `E`.
	pub fn is<E: Entity>(&self) -> bool {
		self.type_id == TypeId::of::<E>()
	}
}

impl PartialEq for EntityType {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for EntityType {}

impl Hash for EntityType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
	}
}

impl fmt::Debug for EntityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("EntityType").field(&self.name).finish()
	}
}

impl fmt::Display for EntityType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}
