//! Query model registry.
//!
//! A query model is a logical type callers build queries against; it is bound
//! to exactly one entity. Each model binds itself in [`QueryModel::register`],
//! which the registry runs once per model type the first time the model is
//! used.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::RwLock;
use quarry_core::ConfigurationError;

use crate::entity::{Entity, EntityType};

/// A logical query model bound to an entity.
///
/// # Examples
///
/// ```ignore
/// struct OrderQuery;
///
/// impl QueryModel for OrderQuery {
///     fn register(registry: &QueryModelRegistry) {
///         registry.bind::<Self, Order>();
///     }
/// }
/// ```
pub trait QueryModel: Send + Sync + 'static {
	/// Diagnostic name used in errors and logs.
	fn model_name() -> &'static str {
		std::any::type_name::<Self>()
	}

	/// Records this model's entity binding. Runs once per registry.
	fn register(registry: &QueryModelRegistry);
}

/// Opaque query model type descriptor.
#[derive(Clone, Copy)]
pub struct ModelType {
	type_id: TypeId,
	name: &'static str,
}

impl ModelType {
	/// Descriptor for query model `M`.
	pub fn of<M: QueryModel>() -> Self {
		Self {
			type_id: TypeId::of::<M>(),
			name: M::model_name(),
		}
	}

	/// Diagnostic name of the model.
	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for ModelType {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl Eq for ModelType {}

impl Hash for ModelType {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.type_id.hash(state);
	}
}

impl fmt::Debug for ModelType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ModelType").field(&self.name).finish()
	}
}

/// Process-wide query model registry.
static MODEL_REGISTRY: Lazy<Arc<QueryModelRegistry>> =
	Lazy::new(|| Arc::new(QueryModelRegistry::new()));

/// Maps query models to their bound entity types.
#[derive(Debug, Default)]
pub struct QueryModelRegistry {
	bindings: RwLock<HashMap<ModelType, EntityType>>,
	initialized: RwLock<HashMap<TypeId, Arc<OnceCell<()>>>>,
}

impl QueryModelRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// The process-wide registry.
	pub fn global() -> Arc<Self> {
		Arc::clone(&MODEL_REGISTRY)
	}

	/// Runs `M::register` against this registry exactly once.
	///
	/// Concurrent callers block until the first registration finishes.
	/// `M::register` must not call `ensure_initialized::<M>()` itself.
	pub fn ensure_initialized<M: QueryModel>(&self) {
		let key = TypeId::of::<M>();
		let existing = self.initialized.read().get(&key).cloned();
		let guard = match existing {
			Some(guard) => guard,
			None => Arc::clone(
				self.initialized
					.write()
					.entry(key)
					.or_insert_with(|| Arc::new(OnceCell::new())),
			),
		};
		// The map lock is released here, so register() may initialize other models
		guard.get_or_init(|| {
			tracing::debug!(model = M::model_name(), "initializing query model");
			M::register(self);
		});
	}

	/// Returns true once `M::register` has completed on this registry.
	pub fn is_initialized<M: QueryModel>(&self) -> bool {
		self.initialized
			.read()
			.get(&TypeId::of::<M>())
			.is_some_and(|guard| guard.get().is_some())
	}

	/// Binds query model `M` to entity `E`.
	pub fn bind<M: QueryModel, E: Entity>(&self) {
		self.bind_types(ModelType::of::<M>(), EntityType::of::<E>());
	}

	/// Binds `model` to `entity`. The latest binding wins.
	pub fn bind_types(&self, model: ModelType, entity: EntityType) {
		let previous = self.bindings.write().insert(model, entity);
		match previous {
			Some(previous) if previous != entity => {
				tracing::warn!(
					model = model.name(),
					previous = previous.name(),
					entity = entity.name(),
					"query model rebound to a different entity"
				);
			}
			Some(_) => {}
			None => {
				tracing::trace!(model = model.name(), entity = entity.name(), "bound query model");
			}
		}
	}

	/// Entity bound to query model `M`, without running its registration.
	pub fn bound_entity_type<M: QueryModel>(&self) -> Option<EntityType> {
		self.bound_entity_for(&ModelType::of::<M>())
	}

	/// Entity bound to `model`.
	pub fn bound_entity_for(&self, model: &ModelType) -> Option<EntityType> {
		self.bindings.read().get(model).copied()
	}

	/// Initializes `M` and returns its entity binding.
	///
	/// Fails with [`ConfigurationError::UnboundQueryModel`] when `M` never
	/// bound itself; the defect is static and not worth retrying.
	pub fn resolve<M: QueryModel>(&self) -> Result<EntityType, ConfigurationError> {
		self.ensure_initialized::<M>();
		self.bound_entity_type::<M>()
			.ok_or_else(|| ConfigurationError::UnboundQueryModel {
				model: M::model_name().to_string(),
			})
	}

	/// Number of bound models.
	pub fn len(&self) -> usize {
		self.bindings.read().len()
	}

	/// Returns true if no models are bound.
	pub fn is_empty(&self) -> bool {
		self.bindings.read().is_empty()
	}

	/// Clears bindings and initialization state (primarily for testing).
	pub fn clear(&self) {
		self.bindings.write().clear();
		self.initialized.write().clear();
	}
}
