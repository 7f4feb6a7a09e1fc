//! Shared helpers for integration tests
//!
//! Every test runs against a fresh in-memory SQLite database migrated with
//! the crate's Migrator, seeded through the entities' active models.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use curator_core::infra::db::entities::{
	annotation, annotation_label, caption, dataset, group_sample, sample, sample_group,
	sample_tag, tag, video_data,
};
use curator_core::infra::db::Migrator;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

pub async fn memory_db() -> DatabaseConnection {
	let conn = Database::connect("sqlite::memory:")
		.await
		.expect("connect to in-memory sqlite");
	Migrator::up(&conn, None).await.expect("run migrations");
	conn
}

pub async fn seed_dataset(conn: &DatabaseConnection, name: &str) -> dataset::Model {
	dataset::ActiveModel {
		id: NotSet,
		uuid: Set(Uuid::new_v4()),
		name: Set(name.to_owned()),
		description: Set(None),
		created_at: Set(Utc::now()),
		updated_at: Set(Utc::now()),
	}
	.insert(conn)
	.await
	.expect("insert dataset")
}

pub struct SampleSpec {
	pub file_name: &'static str,
	pub media_kind: &'static str,
	pub width: Option<i32>,
	pub height: Option<i32>,
	pub created_at: DateTime<Utc>,
}

impl Default for SampleSpec {
	fn default() -> Self {
		Self {
			file_name: "img.jpg",
			media_kind: "image",
			width: Some(640),
			height: Some(480),
			created_at: Utc::now(),
		}
	}
}

pub async fn seed_sample(
	conn: &DatabaseConnection,
	dataset_id: i32,
	spec: SampleSpec,
) -> sample::Model {
	sample::ActiveModel {
		id: NotSet,
		uuid: Set(Uuid::new_v4()),
		dataset_id: Set(dataset_id),
		file_name: Set(spec.file_name.to_owned()),
		media_kind: Set(spec.media_kind.to_owned()),
		width: Set(spec.width),
		height: Set(spec.height),
		created_at: Set(spec.created_at),
		updated_at: Set(spec.created_at),
	}
	.insert(conn)
	.await
	.expect("insert sample")
}

/// Seed `n` image samples with strictly increasing creation times.
pub async fn seed_samples(conn: &DatabaseConnection, dataset_id: i32, n: usize) -> Vec<sample::Model> {
	let base = Utc::now() - Duration::minutes(n as i64);
	let mut out = Vec::with_capacity(n);
	for i in 0..n {
		out.push(
			seed_sample(
				conn,
				dataset_id,
				SampleSpec {
					created_at: base + Duration::minutes(i as i64),
					..Default::default()
				},
			)
			.await,
		);
	}
	out
}

pub async fn seed_tag(conn: &DatabaseConnection, dataset_id: i32, name: &str) -> tag::Model {
	tag::ActiveModel {
		id: NotSet,
		uuid: Set(Uuid::new_v4()),
		dataset_id: Set(dataset_id),
		name: Set(name.to_owned()),
		color: Set(None),
		created_at: Set(Utc::now()),
	}
	.insert(conn)
	.await
	.expect("insert tag")
}

pub async fn attach_tag(conn: &DatabaseConnection, sample_id: i32, tag_id: i32) {
	sample_tag::ActiveModel {
		sample_id: Set(sample_id),
		tag_id: Set(tag_id),
	}
	.insert(conn)
	.await
	.expect("attach tag");
}

pub async fn seed_label(
	conn: &DatabaseConnection,
	dataset_id: i32,
	name: &str,
) -> annotation_label::Model {
	annotation_label::ActiveModel {
		id: NotSet,
		uuid: Set(Uuid::new_v4()),
		dataset_id: Set(dataset_id),
		name: Set(name.to_owned()),
		created_at: Set(Utc::now()),
	}
	.insert(conn)
	.await
	.expect("insert label")
}

pub async fn annotate(conn: &DatabaseConnection, sample_id: i32, label_id: i32) -> annotation::Model {
	annotation::ActiveModel {
		id: NotSet,
		uuid: Set(Uuid::new_v4()),
		sample_id: Set(sample_id),
		label_id: Set(label_id),
		kind: Set("classification".to_owned()),
		data: Set(serde_json::json!({})),
		created_at: Set(Utc::now()),
		updated_at: Set(Utc::now()),
	}
	.insert(conn)
	.await
	.expect("insert annotation")
}

pub async fn add_caption(conn: &DatabaseConnection, sample_id: i32, text: &str) {
	caption::ActiveModel {
		id: NotSet,
		uuid: Set(Uuid::new_v4()),
		sample_id: Set(sample_id),
		text: Set(text.to_owned()),
		created_at: Set(Utc::now()),
	}
	.insert(conn)
	.await
	.expect("insert caption");
}

pub async fn add_video_data(
	conn: &DatabaseConnection,
	sample_id: i32,
	duration_ms: i64,
	frame_count: i32,
) {
	video_data::ActiveModel {
		id: NotSet,
		sample_id: Set(sample_id),
		duration_ms: Set(duration_ms),
		frame_count: Set(frame_count),
		fps: Set(Some(30.0)),
	}
	.insert(conn)
	.await
	.expect("insert video data");
}

pub async fn seed_group(
	conn: &DatabaseConnection,
	dataset_id: i32,
	name: &str,
) -> sample_group::Model {
	sample_group::ActiveModel {
		id: NotSet,
		uuid: Set(Uuid::new_v4()),
		dataset_id: Set(dataset_id),
		name: Set(name.to_owned()),
		created_at: Set(Utc::now()),
	}
	.insert(conn)
	.await
	.expect("insert group")
}

pub async fn add_to_group(conn: &DatabaseConnection, group_id: i32, sample_id: i32) {
	group_sample::ActiveModel {
		group_id: Set(group_id),
		sample_id: Set(sample_id),
	}
	.insert(conn)
	.await
	.expect("add sample to group");
}
