//! Query trees.
//!
//! A [`Query`] is an ordered list of entries. Each entry joins either a
//! criteria node or a nested sub-query to everything before it with a
//! [`Connector`]; entries fold left to right and the first entry's connector
//! carries no meaning.
//!
//! Builder methods mutate the receiver and return it for chaining. Sub-queries
//! are taken by value, so combining never touches the argument afterwards and
//! a query can never contain itself.
//!
//! A `Query` is not meant to be mutated from several threads at once; callers
//! that share one must serialize access themselves.

use std::fmt;

use quarry_core::{FieldValue, PagingFilter};
use quarry_model::EntityType;

use crate::criteria::{Criteria, CriteriaOperator};

/// Boolean connector joining an entry to the entries before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connector {
	And,
	Or,
}

impl Connector {
	fn keyword(self) -> &'static str {
		match self {
			Connector::And => "AND",
			Connector::Or => "OR",
		}
	}
}

/// What a query entry holds.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryItem {
	Criteria(Criteria),
	/// Parenthesized sub-query
	Group(Query),
}

/// One connector-prefixed entry of a query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryEntry {
	connector: Connector,
	item: QueryItem,
}

impl QueryEntry {
	pub fn connector(&self) -> Connector {
		self.connector
	}

	pub fn item(&self) -> &QueryItem {
		&self.item
	}

	/// The criteria node, if this entry is one.
	pub fn as_criteria(&self) -> Option<&Criteria> {
		match &self.item {
			QueryItem::Criteria(criteria) => Some(criteria),
			QueryItem::Group(_) => None,
		}
	}

	/// The sub-query, if this entry is one.
	pub fn as_group(&self) -> Option<&Query> {
		match &self.item {
			QueryItem::Group(query) => Some(query),
			QueryItem::Criteria(_) => None,
		}
	}
}

/// Composable filter expression with an entity binding and optional paging.
///
/// # Examples
///
/// ```
/// use quarry_query::{CriteriaOperator, Query};
///
/// let mut active = Query::new();
/// active.equal("status", "active");
///
/// let mut query = Query::new();
/// query
///     .and("age", CriteriaOperator::GreaterThanOrEqual, 18)
///     .in_values("region", ["eu", "us"])
///     .and_query(active);
///
/// assert_eq!(
///     query.to_string(),
///     "age >= 18 AND region IN ['eu', 'us'] AND (status = 'active')"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
	entries: Vec<QueryEntry>,
	entity_type: Option<EntityType>,
	paging: Option<PagingFilter>,
}

impl Query {
	/// Creates an empty, unbound query.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty query bound to `entity_type`.
	pub fn for_entity(entity_type: EntityType) -> Self {
		Self {
			entity_type: Some(entity_type),
			..Self::default()
		}
	}

	/// Appends `field operator value` joined with AND.
	pub fn and(
		&mut self,
		field: impl Into<String>,
		operator: CriteriaOperator,
		value: impl Into<FieldValue>,
	) -> &mut Self {
		self.push_criteria(Connector::And, Criteria::compare(field, operator, value))
	}

	/// Appends `field operator value` joined with OR.
	pub fn or_criteria(
		&mut self,
		field: impl Into<String>,
		operator: CriteriaOperator,
		value: impl Into<FieldValue>,
	) -> &mut Self {
		self.push_criteria(Connector::Or, Criteria::compare(field, operator, value))
	}

	/// Appends `field = value` joined with AND.
	pub fn equal(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
		self.and(field, CriteriaOperator::Equal, value)
	}

	/// Appends `field <> value` joined with AND.
	pub fn not_equal(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
		self.and(field, CriteriaOperator::NotEqual, value)
	}

	/// Appends `field IN (values)` joined with AND.
	pub fn in_values<I, V>(&mut self, field: impl Into<String>, values: I) -> &mut Self
	where
		I: IntoIterator<Item = V>,
		V: Into<FieldValue>,
	{
		self.push_criteria(
			Connector::And,
			Criteria::list(field, CriteriaOperator::In, values),
		)
	}

	/// Appends `field NOT IN (values)` joined with AND.
	pub fn not_in_values<I, V>(&mut self, field: impl Into<String>, values: I) -> &mut Self
	where
		I: IntoIterator<Item = V>,
		V: Into<FieldValue>,
	{
		self.push_criteria(
			Connector::And,
			Criteria::list(field, CriteriaOperator::NotIn, values),
		)
	}

	/// Appends `field IS NULL` joined with AND.
	pub fn is_null(&mut self, field: impl Into<String>) -> &mut Self {
		self.push_criteria(
			Connector::And,
			Criteria::unary(field, CriteriaOperator::IsNull),
		)
	}

	/// Appends `field IS NOT NULL` joined with AND.
	pub fn not_null(&mut self, field: impl Into<String>) -> &mut Self {
		self.push_criteria(
			Connector::And,
			Criteria::unary(field, CriteriaOperator::NotNull),
		)
	}

	/// Absorbs `query` as a sub-query joined with AND.
	pub fn and_query(&mut self, query: Query) -> &mut Self {
		self.push_group(Connector::And, query)
	}

	/// Absorbs `query` as a sub-query joined with OR.
	pub fn or_query(&mut self, query: Query) -> &mut Self {
		self.push_group(Connector::Or, query)
	}

	/// Appends a prepared criteria node.
	pub fn push_criteria(&mut self, connector: Connector, criteria: Criteria) -> &mut Self {
		self.entries.push(QueryEntry {
			connector,
			item: QueryItem::Criteria(criteria),
		});
		self
	}

	/// Appends a sub-query. Empty sub-queries are kept as given.
	pub fn push_group(&mut self, connector: Connector, query: Query) -> &mut Self {
		self.entries.push(QueryEntry {
			connector,
			item: QueryItem::Group(query),
		});
		self
	}

	/// Binds the query to `entity_type`. The latest binding is authoritative.
	pub fn set_entity_type(&mut self, entity_type: EntityType) -> &mut Self {
		if let Some(previous) = self.entity_type.filter(|previous| *previous != entity_type) {
			tracing::warn!(
				previous = previous.name(),
				entity = entity_type.name(),
				"query rebound to a different entity"
			);
		}
		self.entity_type = Some(entity_type);
		self
	}

	/// Entity the query is bound to.
	pub fn entity_type(&self) -> Option<EntityType> {
		self.entity_type
	}

	/// Replaces the paging request.
	pub fn set_paging(&mut self, paging: Option<PagingFilter>) -> &mut Self {
		self.paging = paging;
		self
	}

	/// Paging request, if any.
	pub fn paging(&self) -> Option<&PagingFilter> {
		self.paging.as_ref()
	}

	/// Top-level entries in order.
	pub fn entries(&self) -> &[QueryEntry] {
		&self.entries
	}

	/// Number of top-level entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true when the query has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Every criteria node in the tree, depth first.
	pub fn criteria(&self) -> CriteriaIter<'_> {
		CriteriaIter {
			stack: vec![self.entries.iter()],
		}
	}
}

/// Depth-first iterator over the criteria nodes of a [`Query`].
pub struct CriteriaIter<'a> {
	stack: Vec<std::slice::Iter<'a, QueryEntry>>,
}

impl<'a> Iterator for CriteriaIter<'a> {
	type Item = &'a Criteria;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let entries = self.stack.last_mut()?;
			match entries.next() {
				Some(entry) => match &entry.item {
					QueryItem::Criteria(criteria) => return Some(criteria),
					QueryItem::Group(query) => self.stack.push(query.entries.iter()),
				},
				None => {
					self.stack.pop();
				}
			}
		}
	}
}

impl fmt::Display for QueryItem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			QueryItem::Criteria(criteria) => write!(f, "{}", criteria),
			QueryItem::Group(query) => write!(f, "({})", query),
		}
	}
}

/// Renders the left-to-right fold. Whatever precedes a change of connector
/// is parenthesized, so the output reads the same under SQL precedence.
impl fmt::Display for Query {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut entries = self.entries.iter();
		let Some(first) = entries.next() else {
			return Ok(());
		};
		let mut rendered = first.item.to_string();
		let mut previous: Option<Connector> = None;
		for entry in entries {
			if previous.is_some_and(|connector| connector != entry.connector) {
				rendered = format!("({})", rendered);
			}
			rendered = format!("{} {} {}", rendered, entry.connector.keyword(), entry.item);
			previous = Some(entry.connector);
		}
		f.write_str(&rendered)
	}
}
