//! Database access: connection bootstrap, dialect adapter, entities,
//! migrations
//!
//! The backend is chosen by the connection-string scheme. Only SQLite and
//! PostgreSQL are accepted; anything else is rejected before a connection is
//! attempted so no query can ever run against a dialect the adapter does not
//! understand.

use crate::common::{CoreError, QueryError};
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

pub mod dialect;
pub mod entities;
pub mod migration;

pub use migration::Migrator;

/// Map a connection-string scheme onto a supported backend.
pub fn backend_for_url(url: &str) -> Result<DatabaseBackend, QueryError> {
	let scheme = url.split(':').next().unwrap_or_default();
	match scheme {
		"sqlite" => Ok(DatabaseBackend::Sqlite),
		"postgres" | "postgresql" => Ok(DatabaseBackend::Postgres),
		other => Err(QueryError::UnsupportedBackend(other.to_string())),
	}
}

/// An open, migrated database handle.
#[derive(Debug)]
pub struct Db {
	conn: DatabaseConnection,
}

impl Db {
	/// Connect and bring the schema up to date.
	pub async fn connect(url: &str) -> Result<Self, CoreError> {
		let backend = backend_for_url(url)?;

		let conn = Database::connect(url).await?;
		Migrator::up(&conn, None).await?;

		info!(backend = ?backend, "database connected");

		Ok(Self { conn })
	}

	pub fn conn(&self) -> &DatabaseConnection {
		&self.conn
	}

	pub fn backend(&self) -> DatabaseBackend {
		self.conn.get_database_backend()
	}
}
