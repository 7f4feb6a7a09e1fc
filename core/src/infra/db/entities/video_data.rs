//! Video data entity: per-sample side table for video properties

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "video_data")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	#[sea_orm(unique)]
	pub sample_id: i32,

	pub duration_ms: i64,

	pub frame_count: i32,

	pub fps: Option<f64>,
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

impl ActiveModelBehavior for ActiveModel {}
