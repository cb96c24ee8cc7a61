//! Commonly used query-building types.
//!
//! ```
//! use quarry_query::prelude::*;
//! ```

pub use crate::criteria::{Criteria, CriteriaOperator};
pub use crate::factory::QueryFactory;
pub use crate::predicate::{Field, Predicate};
pub use crate::query::{Connector, Query};
pub use quarry_core::{ConfigurationError, FieldValue, PagingFilter, QueryError, QueryResult};
pub use quarry_model::{Entity, QueryModel, QueryModelRegistry};
