//! Integration tests for the process-wide registries.

use quarry_core::{ConfigurationError, FieldValue};
use quarry_model::{
	Entity, EntityRegistry, EntityType, MetadataProvider, QueryModel, QueryModelRegistry,
};
use rstest::rstest;
use serial_test::serial;

struct Account {
	id: i64,
}

impl Entity for Account {
	fn entity_name() -> &'static str {
		"billing.Account"
	}

	fn primary_key_fields() -> &'static [&'static str] {
		&["id"]
	}

	fn field_value(&self, field: &str) -> Option<FieldValue> {
		match field {
			"id" => Some(self.id.into()),
			_ => None,
		}
	}
}

struct AccountQuery;

impl QueryModel for AccountQuery {
	fn register(registry: &QueryModelRegistry) {
		registry.bind::<Self, Account>();
	}
}

struct OrphanQuery;

impl QueryModel for OrphanQuery {
	fn register(_registry: &QueryModelRegistry) {}
}

#[rstest]
#[serial(global_registry)]
fn test_global_instances_are_shared() {
	let first = QueryModelRegistry::global();
	let second = QueryModelRegistry::global();
	first.clear();

	first.ensure_initialized::<AccountQuery>();

	assert!(second.is_initialized::<AccountQuery>());
	assert_eq!(
		second.bound_entity_type::<AccountQuery>(),
		Some(EntityType::of::<Account>())
	);
	first.clear();
}

#[rstest]
#[serial(global_registry)]
fn test_global_orphan_model_fails() {
	let registry = QueryModelRegistry::global();
	registry.clear();

	let error = registry.resolve::<OrphanQuery>().unwrap_err();
	assert!(matches!(error, ConfigurationError::UnboundQueryModel { .. }));
	registry.clear();
}

#[rstest]
#[serial(global_registry)]
fn test_global_entity_registry_provider() {
	let registry = EntityRegistry::global();
	registry.clear();
	registry.register::<Account>();

	let provider: &dyn MetadataProvider = &*registry;
	assert_eq!(
		provider.primary_keys(&EntityType::of::<Account>()),
		vec!["id".to_string()]
	);
	assert_eq!(
		provider.property_value(&Account { id: 5 }, "id"),
		Some(FieldValue::Int(5))
	);
	registry.clear();
}
