//! Projection cache entity
//!
//! Content-addressed store for computed 2-D projections. Rows are written
//! once per distinct cache key and never updated; the unique key plus
//! insert-ignore semantics make storage at-most-once even when two writers
//! race on the same miss.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projection_cache")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	#[sea_orm(unique)]
	pub cache_key: String,

	pub model_id: String,

	pub sample_count: i32,

	pub xs: Json,

	pub ys: Json,

	pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
	/// Stored coordinate arrays, in canonical (sorted-by-sample-uuid) order.
	pub fn coordinates(&self) -> Option<(Vec<f32>, Vec<f32>)> {
		let xs: Vec<f32> = serde_json::from_value(self.xs.clone()).ok()?;
		let ys: Vec<f32> = serde_json::from_value(self.ys.clone()).ok()?;
		if xs.len() != ys.len() || xs.len() != self.sample_count as usize {
			return None;
		}
		Some((xs, ys))
	}
}
