//! Annotation label entity: the dataset-scoped label vocabulary

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "annotation_label")]
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

	#[sea_orm(has_many = "super::annotation::Entity")]
	Annotations,
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

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			uuid: Set(Uuid::new_v4()),
			created_at: Set(chrono::Utc::now()),
			..ActiveModelTrait::default()
		}
	}
}
