//! Annotation entity
//!
//! One row per label instance on a sample. The geometry payload is a JSON
//! document whose shape depends on the annotation kind.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "annotation")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	#[sea_orm(unique)]
	pub uuid: Uuid,

	pub sample_id: i32,

	pub label_id: i32,

	pub kind: String, // AnnotationKind enum as string

	pub data: Json,

	pub created_at: DateTime<Utc>,

	pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::sample::Entity",
		from = "Column::SampleId",
		to = "super::sample::Column::Id"
	)]
	Sample,

	#[sea_orm(
		belongs_to = "super::annotation_label::Entity",
		from = "Column::LabelId",
		to = "super::annotation_label::Column::Id"
	)]
	Label,
}

impl Related<super::sample::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Sample.def()
	}
}

impl Related<super::annotation_label::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Label.def()
	}
}

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			uuid: Set(Uuid::new_v4()),
			kind: Set("classification".to_owned()),
			data: Set(serde_json::json!({})),
			created_at: Set(chrono::Utc::now()),
			updated_at: Set(chrono::Utc::now()),
			..ActiveModelTrait::default()
		}
	}
}

/// Helper enum for annotation kinds (for validation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnnotationKind {
	Classification,
	BoundingBox,
	Polygon,
	Keypoints,
}

impl AnnotationKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			AnnotationKind::Classification => "classification",
			AnnotationKind::BoundingBox => "bbox",
			AnnotationKind::Polygon => "polygon",
			AnnotationKind::Keypoints => "keypoints",
		}
	}

	pub fn from_str(s: &str) -> Option<Self> {
		match s {
			"classification" => Some(AnnotationKind::Classification),
			"bbox" => Some(AnnotationKind::BoundingBox),
			"polygon" => Some(AnnotationKind::Polygon),
			"keypoints" => Some(AnnotationKind::Keypoints),
			_ => None,
		}
	}
}
