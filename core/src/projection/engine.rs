//! External projection engine
//!
//! Reducing ≥3 high-dimensional embeddings to 2-D is delegated to a licensed
//! external service. The trait keeps the cache testable; the remote
//! implementation is the production path.

use crate::common::ProjectionError;
use crate::config::ProjectionConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reduces a batch of embedding vectors to 2-D points.
#[async_trait]
pub trait ProjectionEngine: Send + Sync {
	async fn project(&self, vectors: &[Vec<f32>]) -> Result<Vec<(f32, f32)>, ProjectionError>;
}

/// HTTP client for the hosted projection service.
pub struct RemoteProjectionEngine {
	client: reqwest::Client,
	endpoint: String,
	license_key: String,
}

impl RemoteProjectionEngine {
	/// Build from configuration. A missing license key is a configuration
	/// error, not a silent skip.
	pub fn from_config(config: &ProjectionConfig) -> Result<Self, ProjectionError> {
		let license_key = config
			.license_key()
			.ok_or(ProjectionError::MissingLicense)?;

		Ok(Self {
			client: reqwest::Client::new(),
			endpoint: config.endpoint.clone(),
			license_key,
		})
	}
}

#[derive(Serialize)]
struct ProjectRequest<'a> {
	vectors: &'a [Vec<f32>],
}

#[derive(Deserialize)]
struct ProjectResponse {
	x: Vec<f32>,
	y: Vec<f32>,
}

#[async_trait]
impl ProjectionEngine for RemoteProjectionEngine {
	async fn project(&self, vectors: &[Vec<f32>]) -> Result<Vec<(f32, f32)>, ProjectionError> {
		let response = self
			.client
			.post(&self.endpoint)
			.bearer_auth(&self.license_key)
			.json(&ProjectRequest { vectors })
			.send()
			.await?
			.error_for_status()?;

		let body: ProjectResponse = response.json().await?;

		if body.x.len() != vectors.len() || body.y.len() != vectors.len() {
			return Err(ProjectionError::Service(format!(
				"expected {} points, got {}x/{}y",
				vectors.len(),
				body.x.len(),
				body.y.len()
			)));
		}

		Ok(body.x.into_iter().zip(body.y).collect())
	}
}
