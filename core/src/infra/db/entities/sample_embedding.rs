//! Sample embedding entity
//!
//! Stores one high-dimensional vector per (sample, embedding model) pair,
//! together with a blake3 fingerprint of the vector. The fingerprint is what
//! the projection cache hashes; comparing digests is much cheaper than
//! comparing vectors.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sample_embedding")]
pub struct Model {
	#[sea_orm(primary_key)]
	pub id: i32,

	pub sample_id: i32,

	pub model_id: String,

	/// Vector in bracketed literal form (`[0.1,0.2,…]`), readable by both
	/// the SQLite vector extension and pgvector casts.
	pub vector: String,

	pub fingerprint: String,

	pub created_at: DateTime<Utc>,
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

impl Model {
	/// Bracketed vector literal understood by both supported backends.
	pub fn encode_vector(vector: &[f32]) -> String {
		let mut out = String::with_capacity(vector.len() * 8 + 2);
		out.push('[');
		for (i, v) in vector.iter().enumerate() {
			if i > 0 {
				out.push(',');
			}
			out.push_str(&v.to_string());
		}
		out.push(']');
		out
	}

	pub fn decode_vector(encoded: &str) -> Option<Vec<f32>> {
		let inner = encoded.strip_prefix('[')?.strip_suffix(']')?;
		if inner.trim().is_empty() {
			return Some(Vec::new());
		}
		inner
			.split(',')
			.map(|v| v.trim().parse::<f32>().ok())
			.collect()
	}

	/// blake3 digest over the canonical little-endian f32 encoding.
	pub fn fingerprint_of(vector: &[f32]) -> String {
		let mut hasher = blake3::Hasher::new();
		for v in vector {
			hasher.update(&v.to_le_bytes());
		}
		hasher.finalize().to_hex().to_string()
	}

	/// Insert or replace the embedding for `(sample_id, model_id)`.
	pub async fn store<C: ConnectionTrait>(
		conn: &C,
		sample_id: i32,
		model_id: &str,
		vector: &[f32],
	) -> Result<(), DbErr> {
		let active = ActiveModel {
			id: NotSet,
			sample_id: Set(sample_id),
			model_id: Set(model_id.to_owned()),
			vector: Set(Self::encode_vector(vector)),
			fingerprint: Set(Self::fingerprint_of(vector)),
			created_at: Set(chrono::Utc::now()),
		};

		Entity::insert(active)
			.on_conflict(
				OnConflict::columns([Column::SampleId, Column::ModelId])
					.update_columns([Column::Vector, Column::Fingerprint, Column::CreatedAt])
					.to_owned(),
			)
			.exec(conn)
			.await?;

		Ok(())
	}

	/// Fetch embedding rows keyed by sample uuid for a model. Samples without
	/// a stored embedding are simply absent from the result.
	pub async fn for_samples<C: ConnectionTrait>(
		conn: &C,
		sample_uuids: &[Uuid],
		model_id: &str,
	) -> Result<Vec<(Uuid, Model)>, DbErr> {
		use sea_orm::{ColumnTrait, QueryFilter};

		let rows: Vec<(Model, Option<super::sample::Model>)> = Entity::find()
			.find_also_related(super::sample::Entity)
			.filter(Column::ModelId.eq(model_id))
			.filter(super::sample::Column::Uuid.is_in(sample_uuids.iter().copied()))
			.order_by_asc(super::sample::Column::Uuid)
			.all(conn)
			.await?;

		Ok(rows
			.into_iter()
			.filter_map(|(embedding, sample)| sample.map(|s| (s.uuid, embedding)))
			.collect())
	}
}
