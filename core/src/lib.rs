//! Curator core
//!
//! Query/filter compilation and the embedding-projection cache for the
//! dataset-curation backend. The HTTP layer consumes this crate; everything
//! here talks to the database through a scoped SeaORM connection and to the
//! external projection service through [`projection::ProjectionEngine`].

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod common;
pub mod config;
pub mod infra;
pub mod metadata;
pub mod projection;
pub mod query;

pub use common::{CoreError, MetadataError, ProjectionError, QueryError, Result, SortDirection};
pub use config::AppConfig;
pub use infra::db::Db;

/// Initialize tracing with an env-filter, falling back to `default_filter`
/// when `RUST_LOG` is unset.
pub fn init_logging(default_filter: &str) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer())
		.init();
}
