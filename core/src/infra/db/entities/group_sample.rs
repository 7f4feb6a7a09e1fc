//! Group/sample junction table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_sample")]
pub struct Model {
	#[sea_orm(primary_key, auto_increment = false)]
	pub group_id: i32,

	#[sea_orm(primary_key, auto_increment = false)]
	pub sample_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
	#[sea_orm(
		belongs_to = "super::sample_group::Entity",
		from = "Column::GroupId",
		to = "super::sample_group::Column::Id"
	)]
	Group,

	#[sea_orm(
		belongs_to = "super::sample::Entity",
		from = "Column::SampleId",
		to = "super::sample::Column::Id"
	)]
	Sample,
}

impl Related<super::sample_group::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Group.def()
	}
}

impl Related<super::sample::Entity> for Entity {
	fn to() -> RelationDef {
		Relation::Sample.def()
	}
}

impl ActiveModelBehavior for ActiveModel {}
