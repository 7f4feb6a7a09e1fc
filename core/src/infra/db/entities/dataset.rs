//! Dataset entity
//!
//! A dataset is the collection scope every query and filter is restricted to.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dataset")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	#[sea_orm(unique)]
	pub uuid: Uuid,

	pub name: String,

	pub description: Option<String>,

	pub created_at: DateTime<Utc>,

	pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(has_many = "super::sample::Entity")]
	Samples,

	#[sea_orm(has_many = "super::tag::Entity")]
	Tags,

	#[sea_orm(has_many = "super::annotation_label::Entity")]
	AnnotationLabels,

	#[sea_orm(has_many = "super::sample_group::Entity")]
	SampleGroups,

	#[sea_orm(has_many = "super::metadata_key::Entity")]
	MetadataKeys,
}

impl Related<super::sample::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Samples.def()
	}
}

impl Related<super::tag::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Tags.def()
	}
}

impl Related<super::annotation_label::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::AnnotationLabels.def()
	}
}

impl Related<super::sample_group::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::SampleGroups.def()
	}
}

impl ActiveModelBehavior for ActiveModel {
	fn new() -> Self {
		Self {
			uuid: Set(Uuid::new_v4()),
			created_at: Set(chrono::Utc::now()),
			updated_at: Set(chrono::Utc::now()),
			..ActiveModelTrait::default()
		}
	}
}
