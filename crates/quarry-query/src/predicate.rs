//! Typed predicates over query model fields.
//!
//! A [`Field`] names one field of query model `M` together with its value
//! type, so comparisons against the wrong model or the wrong value type do
//! not compile. Predicates combine with `&` and `|` and lower into a plain
//! [`Query`] subtree.
//!
//! ```
//! use quarry_query::{Field, Predicate};
//! # use quarry_model::{QueryModel, QueryModelRegistry};
//! # struct UserQuery;
//! # impl QueryModel for UserQuery {
//! #     fn register(_registry: &QueryModelRegistry) {}
//! # }
//!
//! const AGE: Field<UserQuery, i64> = Field::new("age");
//! const NAME: Field<UserQuery, String> = Field::new("name");
//!
//! let adults: Predicate<UserQuery> = AGE.gte(18) & (NAME.begin_like("A") | NAME.is_null());
//! assert_eq!(
//!     adults.lower().to_string(),
//!     "age >= 18 AND (name STARTS WITH 'A' OR name IS NULL)"
//! );
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr};

use quarry_core::FieldValue;
use quarry_model::QueryModel;

use crate::criteria::{Criteria, CriteriaOperator};
use crate::query::{Connector, Query};

/// Typed handle to a field of query model `M` holding values of type `T`.
pub struct Field<M, T> {
	name: &'static str,
	_marker: PhantomData<fn() -> (M, T)>,
}

impl<M, T> Clone for Field<M, T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<M, T> Copy for Field<M, T> {}

impl<M, T> fmt::Debug for Field<M, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Field").field(&self.name).finish()
	}
}

impl<M, T> Field<M, T> {
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			_marker: PhantomData,
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl<M: QueryModel, T: Into<FieldValue>> Field<M, T> {
	fn compare(self, operator: CriteriaOperator, value: impl Into<T>) -> Predicate<M> {
		let typed: T = value.into();
		Predicate::from_criteria(Criteria::compare(self.name, operator, typed))
	}

	fn list<I, V>(self, operator: CriteriaOperator, values: I) -> Predicate<M>
	where
		I: IntoIterator<Item = V>,
		V: Into<T>,
	{
		let values = values.into_iter().map(|value| -> FieldValue {
			let typed: T = value.into();
			typed.into()
		});
		Predicate::from_criteria(Criteria::list(self.name, operator, values))
	}

	pub fn eq(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::Equal, value)
	}

	pub fn ne(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::NotEqual, value)
	}

	pub fn lt(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::LessThan, value)
	}

	pub fn lte(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::LessThanOrEqual, value)
	}

	pub fn gt(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::GreaterThan, value)
	}

	pub fn gte(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::GreaterThanOrEqual, value)
	}

	pub fn is_in<I, V>(self, values: I) -> Predicate<M>
	where
		I: IntoIterator<Item = V>,
		V: Into<T>,
	{
		self.list(CriteriaOperator::In, values)
	}

	pub fn not_in<I, V>(self, values: I) -> Predicate<M>
	where
		I: IntoIterator<Item = V>,
		V: Into<T>,
	{
		self.list(CriteriaOperator::NotIn, values)
	}

	/// Field contains `value`.
	pub fn like(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::Like, value)
	}

	/// Field starts with `value`.
	pub fn begin_like(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::BeginLike, value)
	}

	/// Field ends with `value`.
	pub fn end_like(self, value: impl Into<T>) -> Predicate<M> {
		self.compare(CriteriaOperator::EndLike, value)
	}

	pub fn is_null(self) -> Predicate<M> {
		Predicate::from_criteria(Criteria::unary(self.name, CriteriaOperator::IsNull))
	}

	pub fn not_null(self) -> Predicate<M> {
		Predicate::from_criteria(Criteria::unary(self.name, CriteriaOperator::NotNull))
	}
}

#[derive(Debug, Clone, PartialEq)]
enum PredicateNode {
	Compare(Criteria),
	And(Vec<PredicateNode>),
	Or(Vec<PredicateNode>),
}

impl PredicateNode {
	fn lower_into(self, query: &mut Query, connector: Connector) {
		match self {
			PredicateNode::Compare(criteria) => {
				query.push_criteria(connector, criteria);
			}
			group => {
				let mut sub = Query::new();
				group.lower_children(&mut sub);
				query.push_group(connector, sub);
			}
		}
	}

	fn lower_children(self, query: &mut Query) {
		let (connector, children) = match self {
			PredicateNode::Compare(criteria) => {
				query.push_criteria(Connector::And, criteria);
				return;
			}
			PredicateNode::And(children) => (Connector::And, children),
			PredicateNode::Or(children) => (Connector::Or, children),
		};
		for child in children {
			child.lower_into(query, connector);
		}
	}
}

/// Boolean condition over the fields of query model `M`.
pub struct Predicate<M> {
	node: PredicateNode,
	_model: PhantomData<fn() -> M>,
}

impl<M> Clone for Predicate<M> {
	fn clone(&self) -> Self {
		Self {
			node: self.node.clone(),
			_model: PhantomData,
		}
	}
}

impl<M> PartialEq for Predicate<M> {
	fn eq(&self, other: &Self) -> bool {
		self.node == other.node
	}
}

impl<M> fmt::Debug for Predicate<M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Predicate").field(&self.node).finish()
	}
}

impl<M> Predicate<M> {
	fn from_node(node: PredicateNode) -> Self {
		Self {
			node,
			_model: PhantomData,
		}
	}

	fn from_criteria(criteria: Criteria) -> Self {
		Self::from_node(PredicateNode::Compare(criteria))
	}

	/// Conjunction of every predicate in `predicates`.
	pub fn all(predicates: impl IntoIterator<Item = Predicate<M>>) -> Self {
		Self::from_node(PredicateNode::And(
			predicates.into_iter().map(|p| p.node).collect(),
		))
	}

	/// Disjunction of every predicate in `predicates`.
	pub fn any(predicates: impl IntoIterator<Item = Predicate<M>>) -> Self {
		Self::from_node(PredicateNode::Or(
			predicates.into_iter().map(|p| p.node).collect(),
		))
	}

	pub fn and(self, other: Predicate<M>) -> Self {
		match self.node {
			PredicateNode::And(mut children) => {
				children.push(other.node);
				Self::from_node(PredicateNode::And(children))
			}
			node => Self::from_node(PredicateNode::And(vec![node, other.node])),
		}
	}

	pub fn or(self, other: Predicate<M>) -> Self {
		match self.node {
			PredicateNode::Or(mut children) => {
				children.push(other.node);
				Self::from_node(PredicateNode::Or(children))
			}
			node => Self::from_node(PredicateNode::Or(vec![node, other.node])),
		}
	}

	/// Lowers the predicate into an unbound query.
	///
	/// Top-level AND / OR children become entries of the returned query;
	/// nested groups become sub-queries.
	pub fn lower(self) -> Query {
		let mut query = Query::new();
		self.node.lower_children(&mut query);
		query
	}
}

impl<M> BitAnd for Predicate<M> {
	type Output = Predicate<M>;

	fn bitand(self, rhs: Self) -> Self::Output {
		self.and(rhs)
	}
}

impl<M> BitOr for Predicate<M> {
	type Output = Predicate<M>;

	fn bitor(self, rhs: Self) -> Self::Output {
		self.or(rhs)
	}
}
