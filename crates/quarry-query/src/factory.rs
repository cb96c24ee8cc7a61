//! Query factory.
//!
//! [`QueryFactory`] is the consumer entry point: it creates bare, paged and
//! model-bound queries and appends identity conditions. It is wired to a
//! metadata provider, a query model registry and [`QuerySettings`];
//! [`QueryFactory::global`] uses the process-wide registries with default
//! settings, and the free functions in this module delegate to it.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use quarry_core::{PagingFilter, QueryResult, QuerySettings};
use quarry_model::{
	Entity, EntityRegistry, EntityType, MetadataProvider, QueryModel, QueryModelRegistry,
};

use crate::identity::IdentityConditionBuilder;
use crate::predicate::Predicate;
use crate::query::Query;

static GLOBAL_FACTORY: Lazy<QueryFactory> = Lazy::new(QueryFactory::default);

/// Creates queries and identity conditions.
#[derive(Clone)]
pub struct QueryFactory {
	metadata: Arc<dyn MetadataProvider>,
	models: Arc<QueryModelRegistry>,
	settings: QuerySettings,
}

impl QueryFactory {
	/// Factory over `metadata` and `models` with default settings.
	pub fn new(metadata: Arc<dyn MetadataProvider>, models: Arc<QueryModelRegistry>) -> Self {
		Self {
			metadata,
			models,
			settings: QuerySettings::default(),
		}
	}

	/// The factory over the process-wide registries.
	pub fn global() -> &'static QueryFactory {
		&GLOBAL_FACTORY
	}

	/// Replaces the settings.
	pub fn with_settings(mut self, settings: QuerySettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn settings(&self) -> &QuerySettings {
		&self.settings
	}

	pub fn metadata(&self) -> &Arc<dyn MetadataProvider> {
		&self.metadata
	}

	pub fn models(&self) -> &Arc<QueryModelRegistry> {
		&self.models
	}

	/// Empty, unbound query.
	pub fn create_query(&self) -> Query {
		Query::new()
	}

	/// Empty query carrying `paging`, clamped into the configured bounds.
	pub fn create_paged_query(&self, paging: Option<PagingFilter>) -> Query {
		let mut query = Query::new();
		query.set_paging(paging.map(|paging| self.normalize_paging(paging)));
		query
	}

	/// Empty query bound to the entity of query model `M`.
	///
	/// Runs `M`'s registration on first use. Fails with
	/// [`ConfigurationError::UnboundQueryModel`](quarry_core::ConfigurationError::UnboundQueryModel)
	/// when `M` has no entity binding.
	pub fn create_model_query<M: QueryModel>(&self) -> QueryResult<Query> {
		let entity_type = self.models.resolve::<M>()?;
		tracing::trace!(model = M::model_name(), entity = entity_type.name(), "created model query");
		Ok(Query::for_entity(entity_type))
	}

	/// Model query carrying `paging`.
	pub fn create_model_query_paged<M: QueryModel>(
		&self,
		paging: Option<PagingFilter>,
	) -> QueryResult<Query> {
		let mut query = self.create_model_query::<M>()?;
		query.set_paging(paging.map(|paging| self.normalize_paging(paging)));
		Ok(query)
	}

	/// Model query seeded with `predicate` as one AND-ed sub-query.
	///
	/// `None` behaves like [`create_model_query`](Self::create_model_query).
	pub fn create_model_query_with<M: QueryModel>(
		&self,
		predicate: Option<Predicate<M>>,
	) -> QueryResult<Query> {
		let mut query = self.create_model_query::<M>()?;
		if let Some(predicate) = predicate {
			query.and_query(predicate.lower());
		}
		Ok(query)
	}

	pub(crate) fn create_entity_query<E: Entity>(&self) -> Query {
		Query::for_entity(EntityType::of::<E>())
	}

	/// Appends the condition selecting (or with `exclude`, excluding) every
	/// instance in `data`.
	///
	/// Without a `base`, a fresh query bound to `E` is used. An empty `data`
	/// returns the base query unchanged.
	pub fn append_identity_condition<'d, E, I>(
		&self,
		data: I,
		base: Option<Query>,
		exclude: bool,
	) -> QueryResult<Query>
	where
		E: Entity,
		I: IntoIterator<Item = &'d E>,
	{
		let base = base.unwrap_or_else(|| self.create_entity_query::<E>());
		self.identity_builder().append(data, base, exclude)
	}

	/// Appends the condition selecting (or excluding) a single instance.
	pub fn append_instance_condition<E: Entity>(
		&self,
		data: &E,
		base: Option<Query>,
		exclude: bool,
	) -> QueryResult<Query> {
		let base = base.unwrap_or_else(|| self.create_entity_query::<E>());
		self.identity_builder().append_instance(data, base, exclude)
	}

	fn identity_builder(&self) -> IdentityConditionBuilder<'_> {
		IdentityConditionBuilder::new(self.metadata.as_ref(), &self.settings.identity)
	}

	fn normalize_paging(&self, paging: PagingFilter) -> PagingFilter {
		PagingFilter::with_settings(paging.page, paging.page_size, &self.settings.paging)
	}
}

impl Default for QueryFactory {
	fn default() -> Self {
		Self::new(EntityRegistry::global(), QueryModelRegistry::global())
	}
}

impl fmt::Debug for QueryFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryFactory")
			.field("models", &self.models.len())
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}

/// [`QueryFactory::create_query`] on the global factory.
pub fn create_query() -> Query {
	QueryFactory::global().create_query()
}

/// [`QueryFactory::create_paged_query`] on the global factory.
pub fn create_paged_query(paging: Option<PagingFilter>) -> Query {
	QueryFactory::global().create_paged_query(paging)
}

/// [`QueryFactory::create_model_query`] on the global factory.
pub fn create_model_query<M: QueryModel>() -> QueryResult<Query> {
	QueryFactory::global().create_model_query::<M>()
}

/// [`QueryFactory::create_model_query_with`] on the global factory.
pub fn create_model_query_with<M: QueryModel>(
	predicate: Option<Predicate<M>>,
) -> QueryResult<Query> {
	QueryFactory::global().create_model_query_with(predicate)
}

/// [`QueryFactory::append_identity_condition`] on the global factory.
pub fn append_identity_condition<'d, E, I>(
	data: I,
	base: Option<Query>,
	exclude: bool,
) -> QueryResult<Query>
where
	E: Entity,
	I: IntoIterator<Item = &'d E>,
{
	QueryFactory::global().append_identity_condition(data, base, exclude)
}

/// [`QueryFactory::append_instance_condition`] on the global factory.
pub fn append_instance_condition<E: Entity>(
	data: &E,
	base: Option<Query>,
	exclude: bool,
) -> QueryResult<Query> {
	QueryFactory::global().append_instance_condition(data, base, exclude)
}
