//! Field descriptors
//!
//! A `Field` is a typed handle bound to a concrete column. Comparison
//! methods build expression leaves without touching the database; lowering
//! to SQL happens later, so expressions can be composed and negated freely
//! before any query executes.
//!
//! Tag-set fields do not compare a column at all; `contains` becomes an
//! existence test against the tag junction table. Metadata fields are the
//! separate `MetadataField` handle since their values are typed
//! `MetadataValue`s, not plain SQL values.

use crate::common::MetadataError;
use crate::infra::db::entities::{annotation, sample, sample_metadata, video_data};
use crate::metadata::{MetadataPath, MetadataValue};
use crate::query::expression::Expression;
use sea_orm::sea_query::{ColumnRef, IntoColumnRef};
use sea_orm::Value;

/// Comparison operators on expression leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
	Lt,
	Gt,
	Lte,
	Gte,
	Eq,
	Ne,
	Contains,
	NotContains,
}

impl CompareOp {
	/// The logical complement, used to negate a leaf without wrapping it in
	/// a generic NOT; nested existence checks cannot be negated efficiently
	/// by either backend.
	pub fn complement(self) -> Self {
		match self {
			CompareOp::Lt => CompareOp::Gte,
			CompareOp::Gt => CompareOp::Lte,
			CompareOp::Lte => CompareOp::Gt,
			CompareOp::Gte => CompareOp::Lt,
			CompareOp::Eq => CompareOp::Ne,
			CompareOp::Ne => CompareOp::Eq,
			CompareOp::Contains => CompareOp::NotContains,
			CompareOp::NotContains => CompareOp::Contains,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			CompareOp::Lt => "<",
			CompareOp::Gt => ">",
			CompareOp::Lte => "<=",
			CompareOp::Gte => ">=",
			CompareOp::Eq => "==",
			CompareOp::Ne => "!=",
			CompareOp::Contains => "contains",
			CompareOp::NotContains => "not contains",
		}
	}
}

/// Semantic type of a field, driving which operators lower successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
	String,
	Numeric,
	Datetime,
	TagSet,
}

/// A typed handle on a queryable column.
#[derive(Debug, Clone)]
pub struct Field {
	name: &'static str,
	kind: FieldKind,
	column: ColumnRef,
	/// Primary-key column of the owning entity, for correlated subqueries.
	owner_key: ColumnRef,
}

impl Field {
	fn new(
		name: &'static str,
		kind: FieldKind,
		column: impl IntoColumnRef,
		owner_key: impl IntoColumnRef,
	) -> Self {
		Self {
			name,
			kind,
			column: column.into_column_ref(),
			owner_key: owner_key.into_column_ref(),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn kind(&self) -> FieldKind {
		self.kind
	}

	pub fn column(&self) -> &ColumnRef {
		&self.column
	}

	pub fn owner_key(&self) -> &ColumnRef {
		&self.owner_key
	}

	fn leaf(&self, op: CompareOp, value: impl Into<Value>) -> Expression {
		Expression::Leaf {
			field: self.clone(),
			op,
			value: value.into(),
		}
	}

	pub fn lt(&self, value: impl Into<Value>) -> Expression {
		self.leaf(CompareOp::Lt, value)
	}

	pub fn gt(&self, value: impl Into<Value>) -> Expression {
		self.leaf(CompareOp::Gt, value)
	}

	pub fn lte(&self, value: impl Into<Value>) -> Expression {
		self.leaf(CompareOp::Lte, value)
	}

	pub fn gte(&self, value: impl Into<Value>) -> Expression {
		self.leaf(CompareOp::Gte, value)
	}

	pub fn eq(&self, value: impl Into<Value>) -> Expression {
		self.leaf(CompareOp::Eq, value)
	}

	pub fn ne(&self, value: impl Into<Value>) -> Expression {
		self.leaf(CompareOp::Ne, value)
	}

	/// Membership test for tag-set fields: "sample carries a tag with this
	/// name". Lowering on any other field kind fails with an unsupported-
	/// operator error.
	pub fn contains(&self, tag_name: &str) -> Expression {
		self.leaf(CompareOp::Contains, tag_name)
	}
}

impl sea_orm::IntoSimpleExpr for Field {
	fn into_simple_expr(self) -> sea_orm::sea_query::SimpleExpr {
		sea_orm::sea_query::SimpleExpr::Column(self.column)
	}
}

/// A typed handle on a dotted path into the metadata JSON document.
#[derive(Debug, Clone)]
pub struct MetadataField {
	path: MetadataPath,
	data_column: ColumnRef,
	/// Column on the side table that correlates back to the owner.
	correlation: ColumnRef,
	owner_key: ColumnRef,
}

impl MetadataField {
	/// Handle on the sample metadata document at a pre-parsed path.
	pub(crate) fn for_sample(path: MetadataPath) -> Self {
		Self {
			path,
			data_column: (sample_metadata::Entity, sample_metadata::Column::Data)
				.into_column_ref(),
			correlation: (sample_metadata::Entity, sample_metadata::Column::SampleId)
				.into_column_ref(),
			owner_key: (sample::Entity, sample::Column::Id).into_column_ref(),
		}
	}

	pub fn path(&self) -> &MetadataPath {
		&self.path
	}

	pub fn data_column(&self) -> &ColumnRef {
		&self.data_column
	}

	pub fn correlation(&self) -> &ColumnRef {
		&self.correlation
	}

	pub fn owner_key(&self) -> &ColumnRef {
		&self.owner_key
	}

	fn leaf(&self, op: CompareOp, value: impl Into<MetadataValue>) -> Expression {
		Expression::Metadata {
			field: self.clone(),
			op,
			value: value.into(),
		}
	}

	pub fn lt(&self, value: impl Into<MetadataValue>) -> Expression {
		self.leaf(CompareOp::Lt, value)
	}

	pub fn gt(&self, value: impl Into<MetadataValue>) -> Expression {
		self.leaf(CompareOp::Gt, value)
	}

	pub fn lte(&self, value: impl Into<MetadataValue>) -> Expression {
		self.leaf(CompareOp::Lte, value)
	}

	pub fn gte(&self, value: impl Into<MetadataValue>) -> Expression {
		self.leaf(CompareOp::Gte, value)
	}

	pub fn eq(&self, value: impl Into<MetadataValue>) -> Expression {
		self.leaf(CompareOp::Eq, value)
	}

	pub fn ne(&self, value: impl Into<MetadataValue>) -> Expression {
		self.leaf(CompareOp::Ne, value)
	}

	/// Test that a value exists at this path.
	pub fn is_not_null(&self) -> Expression {
		Expression::MetadataNotNull {
			field: self.clone(),
			negated: false,
		}
	}
}

/// Fields queryable on samples.
pub mod sample_fields {
	use super::*;

	fn owner_key() -> (sample::Entity, sample::Column) {
		(sample::Entity, sample::Column::Id)
	}

	pub fn file_name() -> Field {
		Field::new(
			"file_name",
			FieldKind::String,
			(sample::Entity, sample::Column::FileName),
			owner_key(),
		)
	}

	pub fn media_kind() -> Field {
		Field::new(
			"media_kind",
			FieldKind::String,
			(sample::Entity, sample::Column::MediaKind),
			owner_key(),
		)
	}

	pub fn width() -> Field {
		Field::new(
			"width",
			FieldKind::Numeric,
			(sample::Entity, sample::Column::Width),
			owner_key(),
		)
	}

	pub fn height() -> Field {
		Field::new(
			"height",
			FieldKind::Numeric,
			(sample::Entity, sample::Column::Height),
			owner_key(),
		)
	}

	pub fn created_at() -> Field {
		Field::new(
			"created_at",
			FieldKind::Datetime,
			(sample::Entity, sample::Column::CreatedAt),
			owner_key(),
		)
	}

	pub fn updated_at() -> Field {
		Field::new(
			"updated_at",
			FieldKind::Datetime,
			(sample::Entity, sample::Column::UpdatedAt),
			owner_key(),
		)
	}

	pub fn tags() -> Field {
		// The column reference is unused for tag sets; membership compiles
		// to a subquery on the junction table.
		Field::new(
			"tags",
			FieldKind::TagSet,
			(sample::Entity, sample::Column::Id),
			owner_key(),
		)
	}

	pub fn metadata(path: &str) -> Result<MetadataField, MetadataError> {
		Ok(MetadataField::for_sample(MetadataPath::parse(path)?))
	}
}

/// Fields queryable on the video side table.
pub mod video_fields {
	use super::*;

	fn owner_key() -> (video_data::Entity, video_data::Column) {
		(video_data::Entity, video_data::Column::Id)
	}

	pub fn duration_ms() -> Field {
		Field::new(
			"duration_ms",
			FieldKind::Numeric,
			(video_data::Entity, video_data::Column::DurationMs),
			owner_key(),
		)
	}

	pub fn frame_count() -> Field {
		Field::new(
			"frame_count",
			FieldKind::Numeric,
			(video_data::Entity, video_data::Column::FrameCount),
			owner_key(),
		)
	}

	pub fn fps() -> Field {
		Field::new(
			"fps",
			FieldKind::Numeric,
			(video_data::Entity, video_data::Column::Fps),
			owner_key(),
		)
	}
}

/// Fields queryable on annotations.
pub mod annotation_fields {
	use super::*;

	fn owner_key() -> (annotation::Entity, annotation::Column) {
		(annotation::Entity, annotation::Column::Id)
	}

	pub fn kind() -> Field {
		Field::new(
			"kind",
			FieldKind::String,
			(annotation::Entity, annotation::Column::Kind),
			owner_key(),
		)
	}

	pub fn created_at() -> Field {
		Field::new(
			"created_at",
			FieldKind::Datetime,
			(annotation::Entity, annotation::Column::CreatedAt),
			owner_key(),
		)
	}
}
