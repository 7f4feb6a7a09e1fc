//! Dotted key paths into the metadata JSON document
//!
//! Paths look like `camera.iso` or `detections[0].score`. Segments are
//! restricted to `[A-Za-z0-9_-]` so a path can never smuggle quoting into
//! generated SQL; values always travel as bound parameters anyway.

use crate::common::MetadataError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
	Key(String),
	Index(u32),
}

/// A parsed dotted key path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataPath {
	raw: String,
	segments: Vec<PathSegment>,
}

impl MetadataPath {
	pub fn parse(raw: &str) -> Result<Self, MetadataError> {
		if raw.is_empty() {
			return Err(MetadataError::InvalidPath(raw.to_owned()));
		}

		let mut segments = Vec::new();

		for part in raw.split('.') {
			let (key, indexes) = match part.find('[') {
				Some(pos) => part.split_at(pos),
				None => (part, ""),
			};

			if key.is_empty()
				|| !key
					.chars()
					.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
			{
				return Err(MetadataError::InvalidPath(raw.to_owned()));
			}

			segments.push(PathSegment::Key(key.to_owned()));

			let mut rest = indexes;
			while !rest.is_empty() {
				let Some(end) = rest.find(']') else {
					return Err(MetadataError::InvalidPath(raw.to_owned()));
				};
				let idx: u32 = rest[1..end]
					.parse()
					.map_err(|_| MetadataError::InvalidPath(raw.to_owned()))?;
				segments.push(PathSegment::Index(idx));
				rest = &rest[end + 1..];
				if !rest.is_empty() && !rest.starts_with('[') {
					return Err(MetadataError::InvalidPath(raw.to_owned()));
				}
			}
		}

		Ok(Self {
			raw: raw.to_owned(),
			segments,
		})
	}

	pub fn segments(&self) -> &[PathSegment] {
		&self.segments
	}

	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// The `$.a.b[0]` form consumed by SQLite's `json_extract`.
	pub fn to_sqlite_json_path(&self) -> String {
		let mut out = String::from("$");
		for segment in &self.segments {
			match segment {
				PathSegment::Key(k) => {
					out.push('.');
					out.push_str(k);
				}
				PathSegment::Index(i) => {
					out.push_str(&format!("[{i}]"));
				}
			}
		}
		out
	}
}

impl fmt::Display for MetadataPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_plain_keys() {
		let path = MetadataPath::parse("camera.iso").unwrap();
		assert_eq!(
			path.segments(),
			&[
				PathSegment::Key("camera".into()),
				PathSegment::Key("iso".into())
			]
		);
		assert_eq!(path.to_sqlite_json_path(), "$.camera.iso");
	}

	#[test]
	fn parses_indexed_segments() {
		let path = MetadataPath::parse("detections[0].score").unwrap();
		assert_eq!(
			path.segments(),
			&[
				PathSegment::Key("detections".into()),
				PathSegment::Index(0),
				PathSegment::Key("score".into())
			]
		);
		assert_eq!(path.to_sqlite_json_path(), "$.detections[0].score");
	}

	#[test]
	fn rejects_malformed_paths() {
		for bad in ["", ".", "a..b", "a[", "a[x]", "a]0[", "a.'b'", "a b"] {
			assert!(MetadataPath::parse(bad).is_err(), "accepted {bad:?}");
		}
	}
}
