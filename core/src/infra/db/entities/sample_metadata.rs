//! Sample metadata entity
//!
//! One schema-less JSON document per sample. Key kinds are declared in the
//! `metadata_key` table and enforced on write, not on read.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sample_metadata")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	#[sea_orm(unique)]
	pub sample_id: i32,

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
}

impl Related<super::sample::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Sample.def()
	}
}

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			data: Set(serde_json::json!({})),
			created_at: Set(chrono::Utc::now()),
			updated_at: Set(chrono::Utc::now()),
			..ActiveModelTrait::default()
		}
	}
}
