//! Sample entity
//!
//! One row per ingested image or video. Video-specific properties live in the
//! `video_data` side table; user metadata lives in `sample_metadata`.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sample")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	#[sea_orm(unique)]
	pub uuid: Uuid,

	pub dataset_id: i32,

	pub file_name: String,

	pub media_kind: String, // MediaKind enum as string

	pub width: Option<i32>,

	pub height: Option<i32>,

	pub created_at: DateTime<Utc>,

	pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::dataset::Entity",
		from = "Column::DatasetId",
		to = "super::dataset::Column::Id"
	)]
	Dataset,

	#[sea_orm(has_many = "super::annotation::Entity")]
	Annotations,

	#[sea_orm(has_many = "super::caption::Entity")]
	Captions,

	#[sea_orm(has_many = "super::sample_tag::Entity")]
	SampleTags,

	#[sea_orm(has_many = "super::sample_embedding::Entity")]
	Embeddings,

	#[sea_orm(has_one = "super::video_data::Entity")]
	VideoData,

	#[sea_orm(has_one = "super::sample_metadata::Entity")]
	Metadata,
}

impl Related<super::dataset::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Dataset.def()
	}
}

impl Related<super::annotation::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Annotations.def()
	}
}

impl Related<super::caption::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Captions.def()
	}
}

impl Related<super::video_data::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::VideoData.def()
	}
}

impl Related<super::sample_metadata::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Metadata.def()
	}
}

impl Related<super::sample_embedding::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Embeddings.def()
	}
}

impl Related<super::tag::Entity> for Entity {
	fn to() -> RelationDef {
		super::sample_tag::Relation::Tag.def()
	}

	fn via() -> Option<RelationDef> {
		Some(super::sample_tag::Relation::Sample.def().rev())
	}
}

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			uuid: Set(Uuid::new_v4()),
			media_kind: Set("image".to_owned()),
			created_at: Set(chrono::Utc::now()),
			updated_at: Set(chrono::Utc::now()),
			..ActiveModelTrait::default()
		}
	}
}

impl Model {
	pub fn is_video(&self) -> bool {
		self.media_kind == "video"
	}
}

/// Helper enum for media kinds (for validation)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MediaKind {
	Image,
	Video,
}

impl MediaKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			MediaKind::Image => "image",
			MediaKind::Video => "video",
		}
	}

	pub fn from_str(s: &str) -> Option<Self> {
		match s {
			"image" => Some(MediaKind::Image),
			"video" => Some(MediaKind::Video),
			_ => None,
		}
	}
}
