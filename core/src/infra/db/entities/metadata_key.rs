//! Metadata key entity: per-dataset declared kind for each metadata key path

use crate::metadata::MetadataKind;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "metadata_key")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	pub dataset_id: i32,

	pub key_path: String,

	pub kind: String, // MetadataKind enum as string

	pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::dataset::Entity",
		from = "Column::DatasetId",
		to = "super::dataset::Column::Id"
	)]
	Dataset,
}

impl Related<super::dataset::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Dataset.def()
	}
}

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			created_at: Set(chrono::Utc::now()),
			..ActiveModelTrait::default()
		}
	}
}

impl Model {
	pub fn declared_kind(&self) -> Option<MetadataKind> {
		MetadataKind::from_str(&self.kind)
	}
}
