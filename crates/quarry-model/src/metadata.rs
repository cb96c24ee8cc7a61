//! Entity metadata provider.
//!
//! The query builder asks a [`MetadataProvider`] for an entity's primary key
//! fields and reads key values off instances through it. [`EntityRegistry`]
//! is the in-memory provider populated at startup.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use quarry_core::FieldValue;

use crate::entity::{Entity, EntityInstance, EntityType};

/// Primary key metadata for one entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
	entity_type: EntityType,
	primary_keys: Vec<String>,
}

impl EntityMetadata {
	/// Metadata with an explicit key list.
	pub fn new<I, S>(entity_type: EntityType, primary_keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			entity_type,
			primary_keys: primary_keys.into_iter().map(Into::into).collect(),
		}
	}

	/// Metadata declared by entity `E` itself.
	pub fn of<E: Entity>() -> Self {
		Self::new(EntityType::of::<E>(), E::primary_key_fields().iter().copied())
	}

	/// The described entity type.
	pub fn entity_type(&self) -> EntityType {
		self.entity_type
	}

	/// Ordered primary key field names.
	pub fn primary_keys(&self) -> &[String] {
		&self.primary_keys
	}

	/// Returns true when the entity is identified by more than one field.
	pub fn is_composite(&self) -> bool {
		self.primary_keys.len() > 1
	}
}

/// Source of entity key metadata.
///
/// Lookups are expected to be in-memory and free of side effects.
pub trait MetadataProvider: Send + Sync {
	/// Ordered primary key fields of `entity_type`; empty when none are known.
	fn primary_keys(&self, entity_type: &EntityType) -> Vec<String>;

	/// Reads `field` off `instance`.
	fn property_value(&self, instance: &dyn EntityInstance, field: &str) -> Option<FieldValue> {
		instance.read_field(field)
	}
}

/// Process-wide entity registry.
static ENTITY_REGISTRY: Lazy<Arc<EntityRegistry>> = Lazy::new(|| Arc::new(EntityRegistry::new()));

/// In-memory [`MetadataProvider`] keyed by entity type.
///
/// # Examples
///
/// ```
/// use quarry_core::FieldValue;
/// use quarry_model::{Entity, EntityRegistry, EntityType, MetadataProvider};
///
/// struct Tag {
///     id: i64,
/// }
///
/// impl Entity for Tag {
///     fn primary_key_fields() -> &'static [&'static str] {
///         &["id"]
///     }
///
///     fn field_value(&self, field: &str) -> Option<FieldValue> {
///         (field == "id").then(|| self.id.into())
///     }
/// }
///
/// let registry = EntityRegistry::new();
/// registry.register::<Tag>();
/// assert_eq!(registry.primary_keys(&EntityType::of::<Tag>()), vec!["id".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct EntityRegistry {
	entities: RwLock<HashMap<EntityType, EntityMetadata>>,
}

impl EntityRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide registry.
	pub fn global() -> Arc<Self> {
		Arc::clone(&ENTITY_REGISTRY)
	}

	/// Registers entity `E` with its declared keys.
	///
	/// Idempotent: an existing entry (including an explicit override) is kept.
	pub fn register<E: Entity>(&self) {
		let entity_type = EntityType::of::<E>();
		if self.entities.read().contains_key(&entity_type) {
			return;
		}
		self.entities
			.write()
			.entry(entity_type)
			.or_insert_with(EntityMetadata::of::<E>);
		tracing::trace!(entity = entity_type.name(), "registered entity metadata");
	}

	/// Registers explicit metadata, replacing any existing entry.
	pub fn register_metadata(&self, metadata: EntityMetadata) {
		let entity_type = metadata.entity_type();
		if let Some(previous) = self.entities.write().insert(entity_type, metadata) {
			tracing::debug!(
				entity = entity_type.name(),
				previous_keys = ?previous.primary_keys(),
				"replaced entity metadata"
			);
		}
	}

	/// Metadata registered for `entity_type`.
	pub fn metadata(&self, entity_type: &EntityType) -> Option<EntityMetadata> {
		self.entities.read().get(entity_type).cloned()
	}

	/// Returns true when entity `E` is registered.
	pub fn is_registered<E: Entity>(&self) -> bool {
		self.entities.read().contains_key(&EntityType::of::<E>())
	}

	/// All registered entity types.
	pub fn entity_types(&self) -> Vec<EntityType> {
		self.entities.read().keys().copied().collect()
	}

	/// Number of registered entities.
	pub fn len(&self) -> usize {
		self.entities.read().len()
	}

	/// Returns true if no entities are registered.
	pub fn is_empty(&self) -> bool {
		self.entities.read().is_empty()
	}

	/// Clears all entries (primarily for testing).
	pub fn clear(&self) {
		self.entities.write().clear();
	}
}

impl MetadataProvider for EntityRegistry {
	fn primary_keys(&self, entity_type: &EntityType) -> Vec<String> {
		self.entities
			.read()
			.get(entity_type)
			.map(|metadata| metadata.primary_keys().to_vec())
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Invoice {
		number: String,
	}

	impl Entity for Invoice {
		fn primary_key_fields() -> &'static [&'static str] {
			&["number"]
		}

		fn field_value(&self, field: &str) -> Option<FieldValue> {
			match field {
				"number" => Some(self.number.as_str().into()),
				_ => None,
			}
		}
	}

	struct Shipment;

	impl Entity for Shipment {
		fn primary_key_fields() -> &'static [&'static str] {
			&["carrier", "tracking_no"]
		}

		fn field_value(&self, _field: &str) -> Option<FieldValue> {
			None
		}
	}

	#[rstest]
	fn test_register_and_lookup() {
		let registry = EntityRegistry::new();
		assert!(registry.is_empty());

		registry.register::<Invoice>();
		registry.register::<Shipment>();

		assert_eq!(registry.len(), 2);
		assert!(registry.is_registered::<Invoice>());
		assert_eq!(
			registry.primary_keys(&EntityType::of::<Shipment>()),
			vec!["carrier".to_string(), "tracking_no".to_string()]
		);
		assert!(registry
			.metadata(&EntityType::of::<Shipment>())
			.unwrap()
			.is_composite());
	}

	#[rstest]
	fn test_unregistered_entity_has_no_keys() {
		let registry = EntityRegistry::new();
		assert!(registry.primary_keys(&EntityType::of::<Invoice>()).is_empty());
		assert!(registry.metadata(&EntityType::of::<Invoice>()).is_none());
	}

	#[rstest]
	fn test_register_keeps_explicit_override() {
		let registry = EntityRegistry::new();
		registry.register_metadata(EntityMetadata::new(
			EntityType::of::<Invoice>(),
			["series", "number"],
		));
		registry.register::<Invoice>();

		assert_eq!(
			registry.primary_keys(&EntityType::of::<Invoice>()),
			vec!["series".to_string(), "number".to_string()]
		);
	}

	#[rstest]
	fn test_property_value_reads_instance() {
		let registry = EntityRegistry::new();
		let invoice = Invoice {
			number: "INV-7".to_string(),
		};
		assert_eq!(
			registry.property_value(&invoice, "number"),
			Some(FieldValue::String("INV-7".to_string()))
		);
		assert_eq!(registry.property_value(&invoice, "total"), None);
	}

	#[rstest]
	fn test_clear() {
		let registry = EntityRegistry::new();
		registry.register::<Invoice>();
		registry.clear();
		assert!(!registry.is_registered::<Invoice>());
		assert!(registry.entity_types().is_empty());
	}
}
