//! Tagged scalar values.
//!
//! Every operand a criteria node carries is a [`FieldValue`]. The variant is
//! the value's concrete scalar type, so a list of key values can be checked
//! for homogeneity by comparing [`ValueKind`]s instead of inspecting types at
//! runtime.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scalar value read from an entity field or supplied to a criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum FieldValue {
	/// Absent value
	Null,
	Bool(bool),
	/// Signed integer, widened to 64 bits
	Int(i64),
	/// Unsigned integer, widened to 64 bits
	UInt(u64),
	Float(f64),
	String(String),
	Uuid(Uuid),
	/// UTC timestamp
	DateTime(DateTime<Utc>),
}

/// The scalar type of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum ValueKind {
	Null,
	Bool,
	Int,
	UInt,
	Float,
	String,
	Uuid,
	DateTime,
}

impl FieldValue {
	/// Returns the scalar type of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			FieldValue::Null => ValueKind::Null,
			FieldValue::Bool(_) => ValueKind::Bool,
			FieldValue::Int(_) => ValueKind::Int,
			FieldValue::UInt(_) => ValueKind::UInt,
			FieldValue::Float(_) => ValueKind::Float,
			FieldValue::String(_) => ValueKind::String,
			FieldValue::Uuid(_) => ValueKind::Uuid,
			FieldValue::DateTime(_) => ValueKind::DateTime,
		}
	}

	/// Returns true for [`FieldValue::Null`].
	pub fn is_null(&self) -> bool {
		matches!(self, FieldValue::Null)
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ValueKind::Null => "null",
			ValueKind::Bool => "bool",
			ValueKind::Int => "int",
			ValueKind::UInt => "uint",
			ValueKind::Float => "float",
			ValueKind::String => "string",
			ValueKind::Uuid => "uuid",
			ValueKind::DateTime => "datetime",
		};
		f.write_str(name)
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FieldValue::Null => f.write_str("NULL"),
			FieldValue::Bool(b) => write!(f, "{}", b),
			FieldValue::Int(i) => write!(f, "{}", i),
			FieldValue::UInt(u) => write!(f, "{}", u),
			FieldValue::Float(x) => write!(f, "{}", x),
			// Single quotes are doubled, as in SQL literals
			FieldValue::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
			FieldValue::Uuid(u) => write!(f, "'{}'", u),
			FieldValue::DateTime(dt) => write!(f, "'{}'", dt.to_rfc3339()),
		}
	}
}

impl From<String> for FieldValue {
	fn from(s: String) -> Self {
		FieldValue::String(s)
	}
}

impl From<&str> for FieldValue {
	fn from(s: &str) -> Self {
		FieldValue::String(s.to_string())
	}
}

impl From<&String> for FieldValue {
	fn from(s: &String) -> Self {
		FieldValue::String(s.clone())
	}
}

impl From<bool> for FieldValue {
	fn from(b: bool) -> Self {
		FieldValue::Bool(b)
	}
}

impl From<i64> for FieldValue {
	fn from(i: i64) -> Self {
		FieldValue::Int(i)
	}
}

impl From<i32> for FieldValue {
	fn from(i: i32) -> Self {
		FieldValue::Int(i64::from(i))
	}
}

impl From<i16> for FieldValue {
	fn from(i: i16) -> Self {
		FieldValue::Int(i64::from(i))
	}
}

impl From<u64> for FieldValue {
	fn from(u: u64) -> Self {
		FieldValue::UInt(u)
	}
}

impl From<u32> for FieldValue {
	fn from(u: u32) -> Self {
		FieldValue::UInt(u64::from(u))
	}
}

impl From<f64> for FieldValue {
	fn from(x: f64) -> Self {
		FieldValue::Float(x)
	}
}

impl From<f32> for FieldValue {
	fn from(x: f32) -> Self {
		FieldValue::Float(f64::from(x))
	}
}

impl From<Uuid> for FieldValue {
	fn from(u: Uuid) -> Self {
		FieldValue::Uuid(u)
	}
}

impl From<DateTime<Utc>> for FieldValue {
	fn from(dt: DateTime<Utc>) -> Self {
		FieldValue::DateTime(dt)
	}
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
	fn from(value: Option<T>) -> Self {
		match value {
			Some(v) => v.into(),
			None => FieldValue::Null,
		}
	}
}
