//! Identity conditions.
//!
//! Turns a set of entity instances into criteria over the entity's primary
//! keys, selecting exactly those instances or excluding them.
//!
//! Single-key entities produce one `IN` / `NOT IN` criteria. Composite-key
//! entities produce one sub-query per instance that ANDs every key
//! comparison; the sub-queries are OR-ed into the base query. For exclusion
//! with composite keys that default structure keeps any row differing from
//! every instance in every key field, and [`CompositeExclusion::NoMatchingTuple`]
//! switches to a plain "none of these tuples" condition instead.

use std::collections::HashSet;

use quarry_core::{
	CompositeExclusion, ConfigurationError, FieldValue, IdentitySettings, QueryResult, ValueKind,
};
use quarry_model::{Entity, EntityType, MetadataProvider};

use crate::criteria::{Criteria, CriteriaOperator};
use crate::query::{Connector, Query};

/// Appends identity conditions for instances of one entity to a query.
pub struct IdentityConditionBuilder<'a> {
	provider: &'a dyn MetadataProvider,
	settings: &'a IdentitySettings,
}

impl<'a> IdentityConditionBuilder<'a> {
	pub fn new(provider: &'a dyn MetadataProvider, settings: &'a IdentitySettings) -> Self {
		Self { provider, settings }
	}

	/// Appends the condition selecting (or with `exclude`, excluding) every
	/// instance in `data` to `base`.
	///
	/// An empty `data` returns `base` as given. Otherwise an unbound `base` is
	/// bound to `E`, and a `base` bound to another entity is rejected.
	pub fn append<'d, E, I>(&self, data: I, base: Query, exclude: bool) -> QueryResult<Query>
	where
		E: Entity,
		I: IntoIterator<Item = &'d E>,
	{
		let entity_type = EntityType::of::<E>();
		let keys = self.primary_keys(&entity_type)?;

		let instances: Vec<&E> = data.into_iter().collect();
		if instances.is_empty() {
			tracing::trace!(entity = entity_type.name(), "no instances, query left unchanged");
			return Ok(base);
		}

		let mut query = bind_base(base, entity_type)?;
		let mut rows = self.read_rows(&entity_type, &keys, &instances)?;
		if self.settings.deduplicate_keys {
			dedup_rows(&mut rows);
		}

		if let [key] = keys.as_slice() {
			tracing::debug!(
				entity = entity_type.name(),
				instances = rows.len(),
				exclude,
				"appending single-key identity condition"
			);
			let operator = if exclude {
				CriteriaOperator::NotIn
			} else {
				CriteriaOperator::In
			};
			let values = rows.into_iter().filter_map(|mut row| row.pop());
			query.push_criteria(Connector::And, Criteria::list(key.as_str(), operator, values));
			return Ok(query);
		}

		let no_matching_tuple =
			exclude && self.settings.composite_exclusion == CompositeExclusion::NoMatchingTuple;
		tracing::debug!(
			entity = entity_type.name(),
			keys = keys.len(),
			instances = rows.len(),
			exclude,
			no_matching_tuple,
			"appending composite-key identity condition"
		);

		if no_matching_tuple {
			let mut group = Query::new();
			for row in rows {
				group.and_query(differs_from(&keys, row));
			}
			query.and_query(group);
		} else {
			let operator = if exclude {
				CriteriaOperator::NotEqual
			} else {
				CriteriaOperator::Equal
			};
			for row in rows {
				query.or_query(matches_all(&keys, row, operator));
			}
		}
		Ok(query)
	}

	/// Appends the condition selecting (or excluding) a single instance.
	///
	/// Key comparisons are AND-ed straight into `base`. Excluding a
	/// composite-key instance under [`CompositeExclusion::NoMatchingTuple`]
	/// appends one OR group of `<>` comparisons instead.
	pub fn append_instance<E: Entity>(
		&self,
		data: &E,
		base: Query,
		exclude: bool,
	) -> QueryResult<Query> {
		let entity_type = EntityType::of::<E>();
		let keys = self.primary_keys(&entity_type)?;
		let mut query = bind_base(base, entity_type)?;
		let row = self
			.read_rows(&entity_type, &keys, &[data])?
			.pop()
			.unwrap_or_default();

		tracing::debug!(
			entity = entity_type.name(),
			keys = keys.len(),
			exclude,
			"appending instance identity condition"
		);

		if exclude
			&& keys.len() > 1
			&& self.settings.composite_exclusion == CompositeExclusion::NoMatchingTuple
		{
			query.and_query(differs_from(&keys, row));
			return Ok(query);
		}

		let operator = if exclude {
			CriteriaOperator::NotEqual
		} else {
			CriteriaOperator::Equal
		};
		for (key, value) in keys.iter().zip(row) {
			query.and(key.as_str(), operator, value);
		}
		Ok(query)
	}

	fn primary_keys(&self, entity_type: &EntityType) -> Result<Vec<String>, ConfigurationError> {
		let keys = self.provider.primary_keys(entity_type);
		if keys.is_empty() {
			return Err(ConfigurationError::MissingPrimaryKeys {
				entity: entity_type.name().to_string(),
			});
		}
		Ok(keys)
	}

	/// Reads the key tuple of every instance, in key order.
	fn read_rows<E: Entity>(
		&self,
		entity_type: &EntityType,
		keys: &[String],
		instances: &[&E],
	) -> Result<Vec<Vec<FieldValue>>, ConfigurationError> {
		let mut kinds: Vec<Option<ValueKind>> = vec![None; keys.len()];
		let mut rows = Vec::with_capacity(instances.len());

		for instance in instances {
			let mut row = Vec::with_capacity(keys.len());
			for (key, kind) in keys.iter().zip(kinds.iter_mut()) {
				let value = self.provider.property_value(*instance, key).ok_or_else(|| {
					ConfigurationError::UnreadableKey {
						entity: entity_type.name().to_string(),
						field: key.clone(),
					}
				})?;
				if !value.is_null() {
					match *kind {
						None => *kind = Some(value.kind()),
						Some(expected) if expected != value.kind() => {
							return Err(ConfigurationError::MixedKeyTypes {
								entity: entity_type.name().to_string(),
								field: key.clone(),
								expected,
								found: value.kind(),
							});
						}
						Some(_) => {}
					}
				}
				row.push(value);
			}
			rows.push(row);
		}
		Ok(rows)
	}
}

fn bind_base(mut base: Query, entity_type: EntityType) -> Result<Query, ConfigurationError> {
	match base.entity_type() {
		None => {
			base.set_entity_type(entity_type);
			Ok(base)
		}
		Some(bound) if bound == entity_type => Ok(base),
		Some(bound) => Err(ConfigurationError::EntityMismatch {
			expected: entity_type.name().to_string(),
			found: bound.name().to_string(),
		}),
	}
}

/// Drops repeated key tuples, keeping the first occurrence.
fn dedup_rows(rows: &mut Vec<Vec<FieldValue>>) {
	let mut seen = HashSet::new();
	rows.retain(|row| {
		let signature: Vec<(ValueKind, String)> = row
			.iter()
			.map(|value| (value.kind(), value.to_string()))
			.collect();
		seen.insert(signature)
	});
}

/// `k1 OP v1 AND k2 OP v2 ...`
fn matches_all(keys: &[String], row: Vec<FieldValue>, operator: CriteriaOperator) -> Query {
	let mut sub = Query::new();
	for (key, value) in keys.iter().zip(row) {
		sub.and(key.as_str(), operator, value);
	}
	sub
}

/// `k1 <> v1 OR k2 <> v2 ...`
fn differs_from(keys: &[String], row: Vec<FieldValue>) -> Query {
	let mut sub = Query::new();
	for (key, value) in keys.iter().zip(row) {
		sub.or_criteria(key.as_str(), CriteriaOperator::NotEqual, value);
	}
	sub
}
