//! Sample group entity: named clusters of samples inside a dataset
//! (bursts, near-duplicate groups, manual selections).

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sample_group")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	#[sea_orm(unique)]
	pub uuid: Uuid,

	pub dataset_id: i32,

	pub name: String,

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

	#[sea_orm(has_many = "super::group_sample::Entity")]
	GroupSamples,
}

impl Related<super::dataset::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Dataset.def()
	}
}

impl Related<super::sample::Entity> for Entity {
	fn to() -> RelationDef {
		super::group_sample::Relation::Sample.def()
	}

	fn via() -> Option<RelationDef> {
		Some(super::group_sample::Relation::Group.def().rev())
	}
}

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			uuid: Set(Uuid::new_v4()),
			created_at: Set(chrono::Utc::now()),
			..ActiveModelTrait::default()
		}
	}
}
