//! Metadata write/read path
//!
//! Writes go through the per-key kind check: the first write of a key fixes
//! its kind in `metadata_key`, and any later write of a different kind is
//! rejected. The check runs on write so that reads and query compilation can
//! trust the declared kind without inspecting documents.

use crate::common::MetadataError;
use crate::infra::db::entities::{metadata_key, sample_metadata};
use crate::metadata::{MetadataPath, MetadataValue, PathSegment};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
	ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
	IntoActiveModel, QueryFilter, Set,
};
use tracing::debug;

pub struct MetadataStore;

impl MetadataStore {
	/// Write `value` at `path` on a sample's metadata document.
	pub async fn set<C: ConnectionTrait>(
		conn: &C,
		dataset_id: i32,
		sample_id: i32,
		path: &str,
		value: MetadataValue,
	) -> Result<(), MetadataError> {
		let path = MetadataPath::parse(path)?;

		Self::check_kind(conn, dataset_id, &path, &value).await?;

		let existing = sample_metadata::Entity::find()
			.filter(sample_metadata::Column::SampleId.eq(sample_id))
			.one(conn)
			.await?;

		match existing {
			Some(model) => {
				let mut data = model.data.clone();
				set_path(&mut data, path.segments(), value.to_json());

				let mut active = model.into_active_model();
				active.data = Set(data);
				active.updated_at = Set(chrono::Utc::now());
				active.update(conn).await.map(|_| ())?;
			}
			None => {
				let mut data = serde_json::json!({});
				set_path(&mut data, path.segments(), value.to_json());

				let active = sample_metadata::ActiveModel {
					id: NotSet,
					sample_id: Set(sample_id),
					data: Set(data),
					created_at: Set(chrono::Utc::now()),
					updated_at: Set(chrono::Utc::now()),
				};
				sample_metadata::Entity::insert(active)
					.exec(conn)
					.await
					.map(|_| ())?;
			}
		}

		debug!(sample_id, key = %path, "metadata written");

		Ok(())
	}

	/// Read the value at `path` from a sample's metadata document.
	pub async fn get<C: ConnectionTrait>(
		conn: &C,
		sample_id: i32,
		path: &str,
	) -> Result<Option<MetadataValue>, MetadataError> {
		let path = MetadataPath::parse(path)?;

		let Some(model) = sample_metadata::Entity::find()
			.filter(sample_metadata::Column::SampleId.eq(sample_id))
			.one(conn)
			.await?
		else {
			return Ok(None);
		};

		Ok(get_path(&model.data, path.segments()).and_then(MetadataValue::from_json))
	}

	/// Enforce the per-key declared kind; the first write fixes it.
	async fn check_kind<C: ConnectionTrait>(
		conn: &C,
		dataset_id: i32,
		path: &MetadataPath,
		value: &MetadataValue,
	) -> Result<(), MetadataError> {
		let declared = metadata_key::Entity::find()
			.filter(metadata_key::Column::DatasetId.eq(dataset_id))
			.filter(metadata_key::Column::KeyPath.eq(path.raw()))
			.one(conn)
			.await?;

		if let Some(row) = declared {
			if let Some(expected) = row.declared_kind() {
				if expected != value.kind() {
					return Err(MetadataError::TypeMismatch {
						key: path.raw().to_owned(),
						expected,
						actual: value.kind(),
					});
				}
			}
			return Ok(());
		}

		let active = metadata_key::ActiveModel {
			id: NotSet,
			dataset_id: Set(dataset_id),
			key_path: Set(path.raw().to_owned()),
			kind: Set(value.kind().as_str().to_owned()),
			created_at: Set(chrono::Utc::now()),
		};

		// A racing writer may register the key first; losing that race is
		// fine as long as the kinds agree, which the next write verifies.
		match metadata_key::Entity::insert(active)
			.on_conflict(
				OnConflict::columns([
					metadata_key::Column::DatasetId,
					metadata_key::Column::KeyPath,
				])
				.do_nothing()
				.to_owned(),
			)
			.exec(conn)
			.await
		{
			Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
			Err(e) => Err(e.into()),
		}
	}
}

/// Set a value at a dotted path, creating intermediate objects and padding
/// arrays with nulls as needed.
fn set_path(doc: &mut serde_json::Value, segments: &[PathSegment], value: serde_json::Value) {
	let Some((head, rest)) = segments.split_first() else {
		*doc = value;
		return;
	};

	match head {
		PathSegment::Key(key) => {
			if !doc.is_object() {
				*doc = serde_json::json!({});
			}
			let map = doc.as_object_mut().expect("coerced to object above");
			let slot = map.entry(key.clone()).or_insert(serde_json::Value::Null);
			set_path(slot, rest, value);
		}
		PathSegment::Index(idx) => {
			if !doc.is_array() {
				*doc = serde_json::json!([]);
			}
			let array = doc.as_array_mut().expect("coerced to array above");
			while array.len() <= *idx as usize {
				array.push(serde_json::Value::Null);
			}
			set_path(&mut array[*idx as usize], rest, value);
		}
	}
}

fn get_path<'a>(
	doc: &'a serde_json::Value,
	segments: &[PathSegment],
) -> Option<&'a serde_json::Value> {
	let mut current = doc;
	for segment in segments {
		current = match segment {
			PathSegment::Key(key) => current.get(key)?,
			PathSegment::Index(idx) => current.get(*idx as usize)?,
		};
	}
	Some(current)
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn set_path_builds_intermediate_structure() {
		let mut doc = json!({});
		let path = MetadataPath::parse("camera.iso").unwrap();
		set_path(&mut doc, path.segments(), json!(400));
		assert_eq!(doc, json!({"camera": {"iso": 400}}));

		let path = MetadataPath::parse("detections[1].score").unwrap();
		set_path(&mut doc, path.segments(), json!(0.9));
		assert_eq!(
			doc,
			json!({"camera": {"iso": 400}, "detections": [null, {"score": 0.9}]})
		);
	}

	#[test]
	fn set_path_overwrites_in_place() {
		let mut doc = json!({"camera": {"iso": 100}});
		let path = MetadataPath::parse("camera.iso").unwrap();
		set_path(&mut doc, path.segments(), json!(800));
		assert_eq!(doc, json!({"camera": {"iso": 800}}));
	}

	#[test]
	fn get_path_walks_keys_and_indexes() {
		let doc = json!({"detections": [{"score": 0.5}, {"score": 0.9}]});
		let path = MetadataPath::parse("detections[1].score").unwrap();
		assert_eq!(get_path(&doc, path.segments()), Some(&json!(0.9)));

		let missing = MetadataPath::parse("detections[2].score").unwrap();
		assert_eq!(get_path(&doc, missing.segments()), None);
	}
}
