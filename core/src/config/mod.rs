//! Application configuration

use crate::common::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding the configured projection license key.
const PROJECTION_LICENSE_ENV: &str = "CURATOR_PROJECTION_LICENSE";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
	/// Database connection string; the scheme selects the backend.
	pub database_url: String,

	/// Default tracing filter
	pub log_filter: String,

	/// Projection service configuration
	#[serde(default)]
	pub projection: ProjectionConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			database_url: "sqlite://curator.db".to_string(),
			log_filter: "curator_core=info".to_string(),
			projection: ProjectionConfig::default(),
		}
	}
}

impl AppConfig {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let raw = fs::read_to_string(path)?;
		Ok(toml::from_str(&raw)?)
	}
}

/// Configuration for the external projection service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionConfig {
	/// Endpoint of the hosted projection service
	pub endpoint: String,

	/// License key; overridable via `CURATOR_PROJECTION_LICENSE`
	pub license_key: Option<String>,
}

impl Default for ProjectionConfig {
	fn default() -> Self {
		Self {
			endpoint: "https://projection.curatorhq.com/v1/project".to_string(),
			license_key: None,
		}
	}
}

impl ProjectionConfig {
	/// The effective license key: environment wins over the config file.
	/// `None` when neither source provides a non-empty value.
	pub fn license_key(&self) -> Option<String> {
		std::env::var(PROJECTION_LICENSE_ENV)
			.ok()
			.filter(|v| !v.is_empty())
			.or_else(|| self.license_key.clone().filter(|v| !v.is_empty()))
	}
}
