//! Criteria nodes: the leaves of a query tree.

use std::fmt;

use quarry_core::FieldValue;
use serde::{Deserialize, Serialize};

/// Comparison applied by a criteria node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriteriaOperator {
	Equal,
	NotEqual,
	LessThan,
	LessThanOrEqual,
	GreaterThan,
	GreaterThanOrEqual,
	/// Field value is one of a list
	In,
	/// Field value is none of a list
	NotIn,
	/// Field contains the operand
	Like,
	/// Field starts with the operand
	BeginLike,
	/// Field ends with the operand
	EndLike,
	IsNull,
	NotNull,
}

impl CriteriaOperator {
	/// Diagnostic symbol used by `Display`.
	pub fn symbol(self) -> &'static str {
		match self {
			CriteriaOperator::Equal => "=",
			CriteriaOperator::NotEqual => "<>",
			CriteriaOperator::LessThan => "<",
			CriteriaOperator::LessThanOrEqual => "<=",
			CriteriaOperator::GreaterThan => ">",
			CriteriaOperator::GreaterThanOrEqual => ">=",
			CriteriaOperator::In => "IN",
			CriteriaOperator::NotIn => "NOT IN",
			CriteriaOperator::Like => "CONTAINS",
			CriteriaOperator::BeginLike => "STARTS WITH",
			CriteriaOperator::EndLike => "ENDS WITH",
			CriteriaOperator::IsNull => "IS NULL",
			CriteriaOperator::NotNull => "IS NOT NULL",
		}
	}

	/// The complementary operator, if one exists.
	pub fn negate(self) -> Option<Self> {
		let negated = match self {
			CriteriaOperator::Equal => CriteriaOperator::NotEqual,
			CriteriaOperator::NotEqual => CriteriaOperator::Equal,
			CriteriaOperator::LessThan => CriteriaOperator::GreaterThanOrEqual,
			CriteriaOperator::LessThanOrEqual => CriteriaOperator::GreaterThan,
			CriteriaOperator::GreaterThan => CriteriaOperator::LessThanOrEqual,
			CriteriaOperator::GreaterThanOrEqual => CriteriaOperator::LessThan,
			CriteriaOperator::In => CriteriaOperator::NotIn,
			CriteriaOperator::NotIn => CriteriaOperator::In,
			CriteriaOperator::IsNull => CriteriaOperator::NotNull,
			CriteriaOperator::NotNull => CriteriaOperator::IsNull,
			CriteriaOperator::Like | CriteriaOperator::BeginLike | CriteriaOperator::EndLike => {
				return None;
			}
		};
		Some(negated)
	}

	/// Returns true for operators taking a list operand.
	pub fn takes_list(self) -> bool {
		matches!(self, CriteriaOperator::In | CriteriaOperator::NotIn)
	}

	/// Returns true for operators taking no operand.
	pub fn is_unary(self) -> bool {
		matches!(self, CriteriaOperator::IsNull | CriteriaOperator::NotNull)
	}
}

/// Operand of a criteria node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CriteriaValue {
	/// No operand (null checks)
	None,
	Single(FieldValue),
	/// Ordered operand list for IN / NOT IN
	List(Vec<FieldValue>),
}

impl CriteriaValue {
	/// Operand values in order; empty for [`CriteriaValue::None`].
	pub fn values(&self) -> &[FieldValue] {
		match self {
			CriteriaValue::None => &[],
			CriteriaValue::Single(value) => std::slice::from_ref(value),
			CriteriaValue::List(values) => values,
		}
	}
}

impl From<FieldValue> for CriteriaValue {
	fn from(value: FieldValue) -> Self {
		CriteriaValue::Single(value)
	}
}

impl From<Vec<FieldValue>> for CriteriaValue {
	fn from(values: Vec<FieldValue>) -> Self {
		CriteriaValue::List(values)
	}
}

/// A single `field operator operand` condition.
///
/// Fields are private so a node cannot change after it joins a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
	field: String,
	operator: CriteriaOperator,
	value: CriteriaValue,
}

impl Criteria {
	/// Creates a criteria node, shaping the operand to fit the operator:
	/// unary operators drop it and list operators wrap a single value.
	pub fn new(
		field: impl Into<String>,
		operator: CriteriaOperator,
		value: impl Into<CriteriaValue>,
	) -> Self {
		let value = match (operator.is_unary(), operator.takes_list(), value.into()) {
			(true, _, _) => CriteriaValue::None,
			(false, true, CriteriaValue::Single(single)) => CriteriaValue::List(vec![single]),
			(false, true, CriteriaValue::None) => CriteriaValue::List(Vec::new()),
			(false, false, CriteriaValue::None) => CriteriaValue::Single(FieldValue::Null),
			(_, _, value) => value,
		};
		Self {
			field: field.into(),
			operator,
			value,
		}
	}

	/// `field operator value` with a scalar operand.
	pub fn compare(
		field: impl Into<String>,
		operator: CriteriaOperator,
		value: impl Into<FieldValue>,
	) -> Self {
		Self::new(field, operator, CriteriaValue::Single(value.into()))
	}

	/// `field IN (values)` or `field NOT IN (values)`.
	pub fn list<I, V>(field: impl Into<String>, operator: CriteriaOperator, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<FieldValue>,
	{
		let values = values.into_iter().map(Into::into).collect::<Vec<_>>();
		Self::new(field, operator, CriteriaValue::List(values))
	}

	/// `field IS NULL` or `field IS NOT NULL`.
	pub fn unary(field: impl Into<String>, operator: CriteriaOperator) -> Self {
		Self::new(field, operator, CriteriaValue::None)
	}

	pub fn field(&self) -> &str {
		&self.field
	}

	pub fn operator(&self) -> CriteriaOperator {
		self.operator
	}

	pub fn value(&self) -> &CriteriaValue {
		&self.value
	}
}

impl fmt::Display for CriteriaValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			CriteriaValue::None => Ok(()),
			CriteriaValue::Single(value) => write!(f, "{}", value),
			CriteriaValue::List(values) => {
				f.write_str("[")?;
				for (i, value) in values.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{}", value)?;
				}
				f.write_str("]")
			}
		}
	}
}

impl fmt::Display for Criteria {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.operator.is_unary() {
			write!(f, "{} {}", self.field, self.operator.symbol())
		} else {
			write!(f, "{} {} {}", self.field, self.operator.symbol(), self.value)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(CriteriaOperator::Equal, CriteriaOperator::NotEqual)]
	#[case(CriteriaOperator::LessThan, CriteriaOperator::GreaterThanOrEqual)]
	#[case(CriteriaOperator::GreaterThan, CriteriaOperator::LessThanOrEqual)]
	#[case(CriteriaOperator::In, CriteriaOperator::NotIn)]
	#[case(CriteriaOperator::IsNull, CriteriaOperator::NotNull)]
	fn test_negate_is_involution(#[case] op: CriteriaOperator, #[case] negated: CriteriaOperator) {
		assert_eq!(op.negate(), Some(negated));
		assert_eq!(negated.negate(), Some(op));
	}

	#[rstest]
	fn test_like_family_has_no_negation() {
		assert_eq!(CriteriaOperator::Like.negate(), None);
		assert_eq!(CriteriaOperator::BeginLike.negate(), None);
		assert_eq!(CriteriaOperator::EndLike.negate(), None);
	}

	#[rstest]
	fn test_unary_operator_drops_operand() {
		let criteria = Criteria::new("deleted_at", CriteriaOperator::IsNull, FieldValue::Int(1));
		assert_eq!(criteria.value(), &CriteriaValue::None);
		assert_eq!(criteria.to_string(), "deleted_at IS NULL");
	}

	#[rstest]
	fn test_list_operator_wraps_single_value() {
		let criteria = Criteria::new("id", CriteriaOperator::In, FieldValue::Int(4));
		assert_eq!(criteria.value(), &CriteriaValue::List(vec![FieldValue::Int(4)]));
	}

	#[rstest]
	fn test_display() {
		assert_eq!(
			Criteria::list("id", CriteriaOperator::NotIn, [1_i64, 2, 2]).to_string(),
			"id NOT IN [1, 2, 2]"
		);
		assert_eq!(
			Criteria::compare("name", CriteriaOperator::BeginLike, "Ada").to_string(),
			"name STARTS WITH 'Ada'"
		);
	}

	#[rstest]
	fn test_values_accessor() {
		assert!(CriteriaValue::None.values().is_empty());
		assert_eq!(
			CriteriaValue::Single(FieldValue::Bool(true)).values(),
			&[FieldValue::Bool(true)]
		);
	}
}
