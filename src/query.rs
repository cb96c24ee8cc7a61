//! Criteria trees, predicates, identity conditions and the query factory.

pub use quarry_query::*;
