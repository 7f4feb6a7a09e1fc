//! Typed access to the schema-less JSON metadata side table
//!
//! Metadata values are stored as one JSON document per sample. Every key gets
//! a declared kind on first write and keeps it; later writes of a different
//! kind are rejected. Reads and query predicates address values by dotted key
//! path (`camera.iso`, `detections[0].score`).

use serde::{Deserialize, Serialize};
use strum::Display;

pub mod path;
pub mod store;

pub use path::{MetadataPath, PathSegment};
pub use store::MetadataStore;

use crate::query::field::CompareOp;

/// The declared kind of a metadata key, fixed on first write.
#[derive(Serialize, Deserialize, Display, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MetadataKind {
	String,
	Int,
	Float,
	Bool,
	List,
	Map,
}

impl MetadataKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			MetadataKind::String => "string",
			MetadataKind::Int => "int",
			MetadataKind::Float => "float",
			MetadataKind::Bool => "bool",
			MetadataKind::List => "list",
			MetadataKind::Map => "map",
		}
	}

	pub fn from_str(s: &str) -> Option<Self> {
		match s {
			"string" => Some(MetadataKind::String),
			"int" => Some(MetadataKind::Int),
			"float" => Some(MetadataKind::Float),
			"bool" => Some(MetadataKind::Bool),
			"list" => Some(MetadataKind::List),
			"map" => Some(MetadataKind::Map),
			_ => None,
		}
	}
}

/// A metadata value as written by callers and compared by predicates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum MetadataValue {
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	List(Vec<serde_json::Value>),
	Map(serde_json::Map<String, serde_json::Value>),
}

impl MetadataValue {
	pub fn kind(&self) -> MetadataKind {
		match self {
			MetadataValue::String(_) => MetadataKind::String,
			MetadataValue::Int(_) => MetadataKind::Int,
			MetadataValue::Float(_) => MetadataKind::Float,
			MetadataValue::Bool(_) => MetadataKind::Bool,
			MetadataValue::List(_) => MetadataKind::List,
			MetadataValue::Map(_) => MetadataKind::Map,
		}
	}

	pub fn to_json(&self) -> serde_json::Value {
		match self {
			MetadataValue::String(v) => serde_json::Value::String(v.clone()),
			MetadataValue::Int(v) => serde_json::Value::from(*v),
			MetadataValue::Float(v) => serde_json::Value::from(*v),
			MetadataValue::Bool(v) => serde_json::Value::Bool(*v),
			MetadataValue::List(v) => serde_json::Value::Array(v.clone()),
			MetadataValue::Map(v) => serde_json::Value::Object(v.clone()),
		}
	}

	pub fn from_json(value: &serde_json::Value) -> Option<Self> {
		match value {
			serde_json::Value::String(v) => Some(MetadataValue::String(v.clone())),
			serde_json::Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					Some(MetadataValue::Int(i))
				} else {
					n.as_f64().map(MetadataValue::Float)
				}
			}
			serde_json::Value::Bool(v) => Some(MetadataValue::Bool(*v)),
			serde_json::Value::Array(v) => Some(MetadataValue::List(v.clone())),
			serde_json::Value::Object(v) => Some(MetadataValue::Map(v.clone())),
			serde_json::Value::Null => None,
		}
	}

	/// The SQL bind value for comparisons against the dialect accessor output.
	pub fn to_sql_value(&self) -> sea_orm::Value {
		match self {
			MetadataValue::String(v) => v.clone().into(),
			MetadataValue::Int(v) => (*v).into(),
			MetadataValue::Float(v) => (*v).into(),
			MetadataValue::Bool(v) => (*v).into(),
			// Containers compare by their JSON serialization.
			MetadataValue::List(v) => serde_json::Value::Array(v.clone()).to_string().into(),
			MetadataValue::Map(v) => serde_json::Value::Object(v.clone()).to_string().into(),
		}
	}
}

impl From<&str> for MetadataValue {
	fn from(v: &str) -> Self {
		MetadataValue::String(v.to_owned())
	}
}

impl From<String> for MetadataValue {
	fn from(v: String) -> Self {
		MetadataValue::String(v)
	}
}

impl From<i64> for MetadataValue {
	fn from(v: i64) -> Self {
		MetadataValue::Int(v)
	}
}

impl From<f64> for MetadataValue {
	fn from(v: f64) -> Self {
		MetadataValue::Float(v)
	}
}

impl From<bool> for MetadataValue {
	fn from(v: bool) -> Self {
		MetadataValue::Bool(v)
	}
}

/// A single typed comparison against a metadata key path.
#[derive(Debug, Clone)]
pub struct MetadataPredicate {
	pub path: MetadataPath,
	pub op: CompareOp,
	pub value: MetadataValue,
}

impl MetadataPredicate {
	pub fn new(
		path: &str,
		op: CompareOp,
		value: impl Into<MetadataValue>,
	) -> Result<Self, crate::common::MetadataError> {
		Ok(Self {
			path: MetadataPath::parse(path)?,
			op,
			value: value.into(),
		})
	}

	/// Whether the accessor output must be cast before comparison.
	pub fn value_kind(&self) -> MetadataKind {
		self.value.kind()
	}
}
