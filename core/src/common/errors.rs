//! Unified error handling for the core

use crate::metadata::MetadataKind;
use thiserror::Error;
use uuid::Uuid;

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum CoreError {
	#[error("Database error: {0}")]
	Database(#[from] sea_orm::DbErr),

	#[error("Query error: {0}")]
	Query(#[from] QueryError),

	#[error("Metadata error: {0}")]
	Metadata(#[from] MetadataError),

	#[error("Projection error: {0}")]
	Projection(#[from] ProjectionError),

	#[error("Config error: {0}")]
	Config(#[from] ConfigError),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Other error: {0}")]
	Other(#[from] anyhow::Error),
}

/// Errors raised while compiling or executing queries
#[derive(Error, Debug)]
pub enum QueryError {
	#[error("unsupported backend: {0}")]
	UnsupportedBackend(String),

	#[error("order_by can only be called once per query instance")]
	OrderingAlreadySet,

	#[error("dataset id required for this filter")]
	DatasetIdRequired,

	#[error("operator '{operator}' is not supported on field '{field}'")]
	UnsupportedOperator {
		field: String,
		operator: &'static str,
	},
}

/// Errors raised by the metadata layer
#[derive(Error, Debug)]
pub enum MetadataError {
	#[error("type mismatch for key '{key}': expected {expected}, actual {actual}")]
	TypeMismatch {
		key: String,
		expected: MetadataKind,
		actual: MetadataKind,
	},

	#[error("invalid metadata path '{0}'")]
	InvalidPath(String),

	#[error("Database error: {0}")]
	Database(#[from] sea_orm::DbErr),
}

/// Errors raised by the embedding projection subsystem
#[derive(Error, Debug)]
pub enum ProjectionError {
	#[error("projection license key is not configured")]
	MissingLicense,

	#[error("no embedding stored for sample {sample} under model '{model_id}'")]
	MissingEmbedding { sample: Uuid, model_id: String },

	#[error("projection service error: {0}")]
	Service(String),

	#[error("projection request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("corrupt projection cache entry '{0}'")]
	CorruptCacheEntry(String),

	#[error("Database error: {0}")]
	Database(#[from] sea_orm::DbErr),
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read config file: {0}")]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
