//! Embedding projection cache
//!
//! Content-addressed memoization of 2-D projections. The cache key is a
//! SHA-256 digest over the model id and the (sample uuid, embedding
//! fingerprint) sequence in sorted-uuid order, so a cached projection is
//! reused exactly when the sample set and every embedding are unchanged.
//! No wall-clock or version counters are involved.
//!
//! There is no lock around the miss path: two concurrent misses may both
//! compute, but the unique cache key makes storage at-most-once and the
//! loser's insert is ignored.

use crate::common::ProjectionError;
use crate::infra::db::entities::{projection_cache, sample_embedding};
use crate::projection::engine::ProjectionEngine;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
	ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct ProjectionCache {
	engine: Arc<dyn ProjectionEngine>,
}

impl ProjectionCache {
	pub fn new(engine: Arc<dyn ProjectionEngine>) -> Self {
		Self { engine }
	}

	/// Return 2-D coordinates for `sample_uuids`, computing and persisting
	/// them on first sight of this (sample set, embeddings) combination.
	///
	/// The returned arrays are zipped with the caller's ordering; the digest
	/// is order-independent because fingerprints are hashed in sorted-uuid
	/// order.
	pub async fn get_or_compute<C: ConnectionTrait>(
		&self,
		conn: &C,
		sample_uuids: &[Uuid],
		model_id: &str,
	) -> Result<(Vec<f32>, Vec<f32>), ProjectionError> {
		if sample_uuids.is_empty() {
			return Ok((Vec::new(), Vec::new()));
		}

		// Canonical order: distinct uuids, ascending.
		let embeddings = sample_embedding::Model::for_samples(conn, sample_uuids, model_id)
			.await?
			.into_iter()
			.collect::<BTreeMap<_, _>>();

		let mut canonical: Vec<Uuid> = sample_uuids.to_vec();
		canonical.sort_unstable();
		canonical.dedup();

		for uuid in &canonical {
			if !embeddings.contains_key(uuid) {
				return Err(ProjectionError::MissingEmbedding {
					sample: *uuid,
					model_id: model_id.to_owned(),
				});
			}
		}

		let key = cache_key(model_id, &canonical, &embeddings);

		if let Some(hit) = projection_cache::Entity::find()
			.filter(projection_cache::Column::CacheKey.eq(key.clone()))
			.one(conn)
			.await?
		{
			let (xs, ys) = hit
				.coordinates()
				.ok_or_else(|| ProjectionError::CorruptCacheEntry(key.clone()))?;
			debug!(key = %key, samples = canonical.len(), "projection cache hit");
			return Ok(zip_to_request(sample_uuids, &canonical, &xs, &ys));
		}

		// Degenerate sets have closed-form answers; a projection is
		// undefined below 3 points. Not worth persisting.
		let points: Vec<(f32, f32)> = match canonical.len() {
			1 => vec![(0.0, 0.0)],
			2 => vec![(0.0, 0.0), (1.0, 1.0)],
			_ => {
				let vectors = canonical
					.iter()
					.map(|uuid| {
						let row = &embeddings[uuid];
						sample_embedding::Model::decode_vector(&row.vector).ok_or_else(|| {
							ProjectionError::Service(format!(
								"stored vector for sample {uuid} is not decodable"
							))
						})
					})
					.collect::<Result<Vec<_>, _>>()?;

				let points = self.engine.project(&vectors).await?;

				let xs: Vec<f32> = points.iter().map(|p| p.0).collect();
				let ys: Vec<f32> = points.iter().map(|p| p.1).collect();

				let active = projection_cache::ActiveModel {
					id: NotSet,
					cache_key: Set(key.clone()),
					model_id: Set(model_id.to_owned()),
					sample_count: Set(canonical.len() as i32),
					xs: Set(serde_json::json!(xs)),
					ys: Set(serde_json::json!(ys)),
					created_at: Set(chrono::Utc::now()),
				};

				// A concurrent miss may have stored the same key already;
				// the computation is idempotent, so losing the race is fine.
				match projection_cache::Entity::insert(active)
					.on_conflict(
						OnConflict::column(projection_cache::Column::CacheKey)
							.do_nothing()
							.to_owned(),
					)
					.exec(conn)
					.await
				{
					Ok(_) | Err(DbErr::RecordNotInserted) => {}
					Err(e) => return Err(e.into()),
				}

				info!(key = %key, samples = canonical.len(), "projection computed");

				points
			}
		};

		let xs: Vec<f32> = points.iter().map(|p| p.0).collect();
		let ys: Vec<f32> = points.iter().map(|p| p.1).collect();

		Ok(zip_to_request(sample_uuids, &canonical, &xs, &ys))
	}
}

/// SHA-256 over the model id and the sorted (uuid, fingerprint) pairs.
fn cache_key(
	model_id: &str,
	canonical: &[Uuid],
	embeddings: &BTreeMap<Uuid, sample_embedding::Model>,
) -> String {
	let mut hasher = Sha256::new();
	hasher.update(model_id.as_bytes());
	for uuid in canonical {
		hasher.update(uuid.as_bytes());
		hasher.update(embeddings[uuid].fingerprint.as_bytes());
	}
	hex::encode(hasher.finalize())
}

/// Map coordinates stored in canonical order back onto the caller's
/// ordering (duplicates included).
fn zip_to_request(
	requested: &[Uuid],
	canonical: &[Uuid],
	xs: &[f32],
	ys: &[f32],
) -> (Vec<f32>, Vec<f32>) {
	let positions: BTreeMap<Uuid, usize> = canonical
		.iter()
		.enumerate()
		.map(|(i, uuid)| (*uuid, i))
		.collect();

	let mut out_x = Vec::with_capacity(requested.len());
	let mut out_y = Vec::with_capacity(requested.len());
	for uuid in requested {
		let i = positions[uuid];
		out_x.push(xs[i]);
		out_y.push(ys[i]);
	}
	(out_x, out_y)
}
