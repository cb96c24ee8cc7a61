//! Identity condition behavior through the public factory API.

use std::sync::Arc;

use quarry_core::{CompositeExclusion, ConfigurationError, FieldValue, QuerySettings};
use quarry_model::{Entity, EntityRegistry, EntityType, QueryModelRegistry};
use quarry_query::{Connector, CriteriaOperator, CriteriaValue, Query, QueryFactory};
use rstest::{fixture, rstest};

#[derive(Debug, Clone)]
struct User {
	id: i64,
	name: String,
}

impl Entity for User {
	fn entity_name() -> &'static str {
		"User"
	}

	fn primary_key_fields() -> &'static [&'static str] {
		&["id"]
	}

	fn field_value(&self, field: &str) -> Option<FieldValue> {
		match field {
			"id" => Some(self.id.into()),
			"name" => Some(self.name.as_str().into()),
			_ => None,
		}
	}
}

#[derive(Debug, Clone)]
struct Membership {
	group_id: i64,
	user_id: i64,
}

impl Entity for Membership {
	fn entity_name() -> &'static str {
		"Membership"
	}

	fn primary_key_fields() -> &'static [&'static str] {
		&["group_id", "user_id"]
	}

	fn field_value(&self, field: &str) -> Option<FieldValue> {
		match field {
			"group_id" => Some(self.group_id.into()),
			"user_id" => Some(self.user_id.into()),
			_ => None,
		}
	}
}

struct Keyless;

impl Entity for Keyless {
	fn primary_key_fields() -> &'static [&'static str] {
		&[]
	}

	fn field_value(&self, _field: &str) -> Option<FieldValue> {
		None
	}
}

fn user(id: i64) -> User {
	User {
		id,
		name: format!("user-{id}"),
	}
}

fn membership(group_id: i64, user_id: i64) -> Membership {
	Membership { group_id, user_id }
}

#[fixture]
fn factory() -> QueryFactory {
	let entities = Arc::new(EntityRegistry::new());
	entities.register::<User>();
	entities.register::<Membership>();
	entities.register::<Keyless>();
	QueryFactory::new(entities, Arc::new(QueryModelRegistry::new()))
}

/// Matches one row against a query tree; enough to check the semantics of
/// the generated conditions without a database.
fn evaluate(query: &Query, row: &dyn Fn(&str) -> FieldValue) -> bool {
	let mut result: Option<bool> = None;
	for entry in query.entries() {
		let value = match (entry.as_criteria(), entry.as_group()) {
			(Some(criteria), _) => {
				let actual = row(criteria.field());
				let operands = criteria.value().values();
				match criteria.operator() {
					CriteriaOperator::Equal => operands.first() == Some(&actual),
					CriteriaOperator::NotEqual => operands.first() != Some(&actual),
					CriteriaOperator::In => operands.contains(&actual),
					CriteriaOperator::NotIn => !operands.contains(&actual),
					other => panic!("unsupported operator {other:?}"),
				}
			}
			(None, Some(group)) => evaluate(group, row),
			(None, None) => unreachable!(),
		};
		result = Some(match (result, entry.connector()) {
			(None, _) => value,
			(Some(acc), Connector::And) => acc && value,
			(Some(acc), Connector::Or) => acc || value,
		});
	}
	result.unwrap_or(true)
}

fn membership_row(group_id: i64, user_id: i64) -> impl Fn(&str) -> FieldValue {
	move |field| match field {
		"group_id" => FieldValue::Int(group_id),
		"user_id" => FieldValue::Int(user_id),
		_ => FieldValue::Null,
	}
}

#[rstest]
fn single_key_selects_with_one_in_criteria(factory: QueryFactory) {
	let users = vec![user(3), user(1), user(2)];

	let query = factory.append_identity_condition(&users, None, false).unwrap();

	let criteria: Vec<_> = query.criteria().collect();
	assert_eq!(criteria.len(), 1);
	assert_eq!(criteria[0].field(), "id");
	assert_eq!(criteria[0].operator(), CriteriaOperator::In);
	let mut values = criteria[0].value().values().to_vec();
	values.sort_by_key(|value| value.to_string());
	assert_eq!(
		values,
		vec![FieldValue::Int(1), FieldValue::Int(2), FieldValue::Int(3)]
	);
}

#[rstest]
fn single_key_excludes_with_not_in(factory: QueryFactory) {
	let users = vec![user(7), user(8)];

	let query = factory.append_identity_condition(&users, None, true).unwrap();

	assert_eq!(query.len(), 1);
	let criteria = query.entries()[0].as_criteria().unwrap();
	assert_eq!(criteria.operator(), CriteriaOperator::NotIn);
	assert_eq!(
		criteria.value(),
		&CriteriaValue::List(vec![FieldValue::Int(7), FieldValue::Int(8)])
	);
}

#[rstest]
fn identity_condition_extends_supplied_base(factory: QueryFactory) {
	let mut base = factory.create_query();
	base.equal("name", "ada");

	let query = factory
		.append_identity_condition(&[user(1)], Some(base), false)
		.unwrap();

	assert_eq!(query.to_string(), "name = 'ada' AND id IN [1]");
	assert_eq!(query.entity_type(), Some(EntityType::of::<User>()));
}

#[rstest]
fn composite_keys_produce_one_group_per_instance(factory: QueryFactory) {
	let data = [membership(1, 10), membership(2, 20)];

	let query = factory.append_identity_condition(&data, None, false).unwrap();

	assert_eq!(query.len(), 2);
	for (entry, expected) in query.entries().iter().zip(&data) {
		assert_eq!(entry.connector(), Connector::Or);
		let group = entry.as_group().unwrap();
		assert_eq!(group.len(), 2);
		let pairs: Vec<_> = group
			.criteria()
			.map(|c| (c.field().to_string(), c.operator(), c.value().values()[0].clone()))
			.collect();
		assert_eq!(
			pairs,
			vec![
				(
					"group_id".to_string(),
					CriteriaOperator::Equal,
					FieldValue::Int(expected.group_id)
				),
				(
					"user_id".to_string(),
					CriteriaOperator::Equal,
					FieldValue::Int(expected.user_id)
				),
			]
		);
	}
}

#[rstest]
fn empty_data_returns_base_unchanged(factory: QueryFactory) {
	let mut base = Query::new();
	base.in_values("id", [1, 2]).not_null("name");
	let expected = base.clone();

	let none: Vec<User> = Vec::new();
	let query = factory
		.append_identity_condition(&none, Some(base), false)
		.unwrap();

	assert_eq!(query, expected);
}

#[rstest]
fn repeated_calls_yield_equal_independent_queries(factory: QueryFactory) {
	let instance = user(42);

	let mut first = factory.append_identity_condition([&instance], None, false).unwrap();
	let second = factory.append_identity_condition([&instance], None, false).unwrap();
	assert_eq!(first, second);

	first.equal("name", "changed");
	assert_ne!(first, second);
	assert_eq!(second.len(), 1);
}

#[rstest]
fn keyless_entity_fails_before_reading_data(factory: QueryFactory) {
	let none: Vec<Keyless> = Vec::new();

	let error = factory
		.append_identity_condition(&none, None, false)
		.unwrap_err();

	assert!(error.is_configuration());
	assert!(matches!(
		error.as_configuration(),
		Some(ConfigurationError::MissingPrimaryKeys { .. })
	));
}

#[rstest]
fn unregistered_entity_has_no_keys() {
	let factory = QueryFactory::new(
		Arc::new(EntityRegistry::new()),
		Arc::new(QueryModelRegistry::new()),
	);

	let error = factory
		.append_instance_condition(&user(1), None, false)
		.unwrap_err();

	assert_eq!(
		error.to_string(),
		"Configuration error: Entity `User` has no primary keys configured"
	);
}

#[rstest]
fn base_bound_to_other_entity_is_rejected(factory: QueryFactory) {
	let base = Query::for_entity(EntityType::of::<Membership>());

	let error = factory
		.append_identity_condition(&[user(1)], Some(base), false)
		.unwrap_err();

	assert!(matches!(
		error.as_configuration(),
		Some(ConfigurationError::EntityMismatch { .. })
	));
}

#[rstest]
// By default a row survives when it differs in every field from at least one
// excluded tuple, so the excluded (1, 10) survives and (1, 20) does not.
#[case(CompositeExclusion::AnyFieldDiffers, (1, 10), true)]
#[case(CompositeExclusion::NoMatchingTuple, (1, 10), false)]
#[case(CompositeExclusion::AnyFieldDiffers, (1, 20), false)]
#[case(CompositeExclusion::NoMatchingTuple, (1, 20), true)]
#[case(CompositeExclusion::AnyFieldDiffers, (3, 30), true)]
#[case(CompositeExclusion::NoMatchingTuple, (3, 30), true)]
fn composite_exclusion_semantics(
	factory: QueryFactory,
	#[case] strategy: CompositeExclusion,
	#[case] row: (i64, i64),
	#[case] kept: bool,
) {
	let factory = factory.with_settings(QuerySettings::default().with_composite_exclusion(strategy));
	let excluded = [membership(1, 10), membership(2, 20)];

	let query = factory
		.append_identity_condition(&excluded, None, true)
		.unwrap();

	assert_eq!(evaluate(&query, &membership_row(row.0, row.1)), kept);
}

#[rstest]
fn instance_condition_selects_single_composite_row(factory: QueryFactory) {
	let query = factory
		.append_instance_condition(&membership(4, 44), None, false)
		.unwrap();

	assert_eq!(query.to_string(), "group_id = 4 AND user_id = 44");
	assert!(evaluate(&query, &membership_row(4, 44)));
	assert!(!evaluate(&query, &membership_row(4, 45)));
}

#[rstest]
fn deduplicated_keys_setting(factory: QueryFactory) {
	let factory = factory.with_settings(QuerySettings::default().with_deduplicated_keys(true));
	let users = [user(1), user(1), user(2)];

	let query = factory.append_identity_condition(&users, None, false).unwrap();

	assert_eq!(query.to_string(), "id IN [1, 2]");
}
