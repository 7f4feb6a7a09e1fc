//! Projection cache: closed forms, content addressing, race tolerance

mod helpers;

use async_trait::async_trait;
use curator_core::common::ProjectionError;
use curator_core::config::ProjectionConfig;
use curator_core::infra::db::entities::{projection_cache, sample_embedding};
use curator_core::projection::{ProjectionCache, ProjectionEngine, RemoteProjectionEngine};
use helpers::*;
use pretty_assertions::assert_eq;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Deterministic stand-in for the licensed projection service.
struct CountingEngine {
	calls: AtomicUsize,
}

impl CountingEngine {
	fn new() -> Arc<Self> {
		Arc::new(Self {
			calls: AtomicUsize::new(0),
		})
	}

	fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ProjectionEngine for CountingEngine {
	async fn project(&self, vectors: &[Vec<f32>]) -> Result<Vec<(f32, f32)>, ProjectionError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		Ok(vectors
			.iter()
			.enumerate()
			.map(|(i, v)| (i as f32, v.first().copied().unwrap_or_default()))
			.collect())
	}
}

async fn seed_embedded_samples(
	conn: &DatabaseConnection,
	dataset_id: i32,
	vectors: &[Vec<f32>],
) -> Vec<Uuid> {
	let mut uuids = Vec::new();
	for vector in vectors {
		let sample = seed_sample(conn, dataset_id, SampleSpec::default()).await;
		sample_embedding::Model::store(conn, sample.id, "clip-vit-b32", vector)
			.await
			.unwrap();
		uuids.push(sample.uuid);
	}
	uuids
}

#[tokio::test]
async fn degenerate_sample_counts_have_closed_forms() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "degenerate").await;
	let engine = CountingEngine::new();
	let cache = ProjectionCache::new(engine.clone());

	// Zero samples.
	let (xs, ys) = cache
		.get_or_compute(&conn, &[], "clip-vit-b32")
		.await
		.unwrap();
	assert_eq!(xs, Vec::<f32>::new());
	assert_eq!(ys, Vec::<f32>::new());

	// One sample.
	let uuids = seed_embedded_samples(&conn, dataset.id, &[vec![0.5, 0.5]]).await;
	let (xs, ys) = cache
		.get_or_compute(&conn, &uuids, "clip-vit-b32")
		.await
		.unwrap();
	assert_eq!((xs, ys), (vec![0.0], vec![0.0]));

	// Two samples.
	let mut pair = seed_embedded_samples(&conn, dataset.id, &[vec![0.1], vec![0.2]]).await;
	pair.sort_unstable();
	let (xs, ys) = cache
		.get_or_compute(&conn, &pair, "clip-vit-b32")
		.await
		.unwrap();
	assert_eq!((xs, ys), (vec![0.0, 1.0], vec![0.0, 1.0]));

	// The projection engine is never consulted below 3 points.
	assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn repeated_calls_hit_the_cache() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "hits").await;
	let engine = CountingEngine::new();
	let cache = ProjectionCache::new(engine.clone());

	let uuids =
		seed_embedded_samples(&conn, dataset.id, &[vec![0.1], vec![0.2], vec![0.3]]).await;

	let first = cache
		.get_or_compute(&conn, &uuids, "clip-vit-b32")
		.await
		.unwrap();
	assert_eq!(engine.calls(), 1);

	let second = cache
		.get_or_compute(&conn, &uuids, "clip-vit-b32")
		.await
		.unwrap();
	assert_eq!(engine.calls(), 1, "second call must be a pure cache hit");
	assert_eq!(first, second);

	// One row stored for the set.
	let rows = projection_cache::Entity::find().count(&conn).await.unwrap();
	assert_eq!(rows, 1);
}

#[tokio::test]
async fn key_is_order_independent_and_results_follow_caller_order() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "ordering").await;
	let engine = CountingEngine::new();
	let cache = ProjectionCache::new(engine.clone());

	let uuids =
		seed_embedded_samples(&conn, dataset.id, &[vec![0.1], vec![0.2], vec![0.3]]).await;

	let (xs, ys) = cache
		.get_or_compute(&conn, &uuids, "clip-vit-b32")
		.await
		.unwrap();

	let mut reversed = uuids.clone();
	reversed.reverse();
	let (rev_xs, rev_ys) = cache
		.get_or_compute(&conn, &reversed, "clip-vit-b32")
		.await
		.unwrap();

	assert_eq!(engine.calls(), 1, "permuted input must reuse the same key");

	let forward: Vec<(f32, f32)> = xs.into_iter().zip(ys).collect();
	let mut backward: Vec<(f32, f32)> = rev_xs.into_iter().zip(rev_ys).collect();
	backward.reverse();
	assert_eq!(forward, backward);
}

#[tokio::test]
async fn changed_embeddings_change_the_key() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "invalidate").await;
	let engine = CountingEngine::new();
	let cache = ProjectionCache::new(engine.clone());

	let uuids =
		seed_embedded_samples(&conn, dataset.id, &[vec![0.1], vec![0.2], vec![0.3]]).await;
	cache
		.get_or_compute(&conn, &uuids, "clip-vit-b32")
		.await
		.unwrap();
	assert_eq!(engine.calls(), 1);

	// Re-embed one sample; the fingerprint and therefore the key change.
	let embedding = sample_embedding::Entity::find()
		.one(&conn)
		.await
		.unwrap()
		.unwrap();
	sample_embedding::Model::store(&conn, embedding.sample_id, "clip-vit-b32", &[9.9])
		.await
		.unwrap();

	cache
		.get_or_compute(&conn, &uuids, "clip-vit-b32")
		.await
		.unwrap();
	assert_eq!(engine.calls(), 2, "changed input must recompute");

	let rows = projection_cache::Entity::find().count(&conn).await.unwrap();
	assert_eq!(rows, 2);
}

#[tokio::test]
async fn missing_embedding_is_an_error() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "missing-embedding").await;
	let cache = ProjectionCache::new(CountingEngine::new());

	let bare = seed_sample(&conn, dataset.id, SampleSpec::default()).await;

	let err = cache
		.get_or_compute(&conn, &[bare.uuid], "clip-vit-b32")
		.await
		.unwrap_err();
	assert!(matches!(
		err,
		ProjectionError::MissingEmbedding { sample, .. } if sample == bare.uuid
	));
}

#[tokio::test]
async fn storage_tolerates_a_racing_writer() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "race").await;
	let engine = CountingEngine::new();
	let cache = ProjectionCache::new(engine.clone());

	let uuids =
		seed_embedded_samples(&conn, dataset.id, &[vec![0.1], vec![0.2], vec![0.3]]).await;
	let first = cache
		.get_or_compute(&conn, &uuids, "clip-vit-b32")
		.await
		.unwrap();

	let stored = projection_cache::Entity::find()
		.one(&conn)
		.await
		.unwrap()
		.unwrap();

	// Replay what the losing writer of a concurrent miss would do: insert
	// the same key. The unique key plus insert-ignore keeps storage
	// at-most-once and the stored row untouched.
	let duplicate = projection_cache::ActiveModel {
		id: sea_orm::ActiveValue::NotSet,
		cache_key: sea_orm::Set(stored.cache_key.clone()),
		model_id: sea_orm::Set(stored.model_id.clone()),
		sample_count: sea_orm::Set(stored.sample_count),
		xs: sea_orm::Set(serde_json::json!([7.0, 7.0, 7.0])),
		ys: sea_orm::Set(serde_json::json!([7.0, 7.0, 7.0])),
		created_at: sea_orm::Set(chrono::Utc::now()),
	};
	let result = projection_cache::Entity::insert(duplicate)
		.on_conflict(
			sea_orm::sea_query::OnConflict::column(projection_cache::Column::CacheKey)
				.do_nothing()
				.to_owned(),
		)
		.exec(&conn)
		.await;
	assert!(matches!(
		result,
		Ok(_) | Err(sea_orm::DbErr::RecordNotInserted)
	));

	let rows = projection_cache::Entity::find()
		.filter(projection_cache::Column::CacheKey.eq(stored.cache_key.clone()))
		.all(&conn)
		.await
		.unwrap();
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].xs, stored.xs);

	// And readers still see the original computation.
	let replay = cache
		.get_or_compute(&conn, &uuids, "clip-vit-b32")
		.await
		.unwrap();
	assert_eq!(replay, first);
	assert_eq!(engine.calls(), 1);
}

#[test]
fn remote_engine_requires_a_license() {
	let config = ProjectionConfig {
		endpoint: "http://localhost:9/project".into(),
		license_key: None,
	};
	let result = RemoteProjectionEngine::from_config(&config);
	assert!(matches!(result, Err(ProjectionError::MissingLicense)));

	let config = ProjectionConfig {
		license_key: Some("key-123".into()),
		..config
	};
	assert!(RemoteProjectionEngine::from_config(&config).is_ok());
}
