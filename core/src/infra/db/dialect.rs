//! Dialect-specific SQL generation
//!
//! Exactly two backends are supported: embedded SQLite (JSON1 +
//! `vec_distance_cosine` from the vector extension) and PostgreSQL
//! (`->`/`->>` chains + pgvector's `<=>`). Everything else fails closed:
//! emitting the wrong accessor syntax would silently change query semantics,
//! which is worse than refusing to compile.
//!
//! All caller-supplied strings (JSON paths, vector literals) are passed as
//! bound parameters, never spliced into SQL text.

use crate::common::QueryError;
use crate::metadata::{MetadataKind, MetadataPath, PathSegment};
use sea_orm::sea_query::{ColumnRef, Expr, ExprTrait, SimpleExpr};
use sea_orm::DatabaseBackend;

/// Cast applied to a JSON accessor before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorCast {
	None,
	Numeric,
	Boolean,
}

impl AccessorCast {
	/// JSON values of numeric kinds must be compared as numbers, not text.
	pub fn for_kind(kind: MetadataKind) -> Self {
		match kind {
			MetadataKind::Int | MetadataKind::Float => AccessorCast::Numeric,
			MetadataKind::Bool => AccessorCast::Boolean,
			MetadataKind::String | MetadataKind::List | MetadataKind::Map => AccessorCast::None,
		}
	}
}

/// Extract a JSON value at `path` from `column`, cast for comparison.
pub fn json_extract(
	backend: DatabaseBackend,
	column: ColumnRef,
	path: &MetadataPath,
	cast: AccessorCast,
) -> Result<SimpleExpr, QueryError> {
	match backend {
		DatabaseBackend::Sqlite => {
			let base = Expr::cust_with_exprs(
				"json_extract($1, $2)",
				[
					SimpleExpr::Column(column),
					Expr::value(path.to_sqlite_json_path()),
				],
			);
			Ok(match cast {
				AccessorCast::Numeric => Expr::cust_with_exprs("CAST($1 AS REAL)", [base]),
				// SQLite's json_extract already yields 0/1 for booleans.
				AccessorCast::None | AccessorCast::Boolean => base,
			})
		}
		DatabaseBackend::Postgres => {
			let mut expr = SimpleExpr::Column(column);
			let segments = path.segments();
			for (i, segment) in segments.iter().enumerate() {
				// `->` keeps JSON until the final step, `->>` lands on text.
				let op = if i + 1 == segments.len() { "->>" } else { "->" };
				expr = match segment {
					PathSegment::Key(key) => Expr::cust_with_exprs(
						format!("$1{op}$2"),
						[expr, Expr::value(key.clone())],
					),
					PathSegment::Index(idx) => Expr::cust_with_exprs(
						format!("$1{op}$2"),
						[expr, Expr::value(*idx as i32)],
					),
				};
			}
			Ok(match cast {
				AccessorCast::Numeric => {
					Expr::cust_with_exprs("($1)::double precision", [expr])
				}
				AccessorCast::Boolean => Expr::cust_with_exprs("($1)::boolean", [expr]),
				AccessorCast::None => expr,
			})
		}
		other => Err(QueryError::UnsupportedBackend(format!("{other:?}"))),
	}
}

/// Test that a JSON value exists (is not null) at `path`.
pub fn json_is_not_null(
	backend: DatabaseBackend,
	column: ColumnRef,
	path: &MetadataPath,
) -> Result<SimpleExpr, QueryError> {
	let accessor = json_extract(backend, column, path, AccessorCast::None)?;
	Ok(accessor.is_not_null())
}

/// Cosine distance between a stored vector column and a literal vector.
///
/// pgvector needs the `::vector` cast on both operands; the SQLite extension
/// takes the text literals as-is.
pub fn cosine_distance(
	backend: DatabaseBackend,
	column: ColumnRef,
	vector_literal: &str,
) -> Result<SimpleExpr, QueryError> {
	match backend {
		DatabaseBackend::Sqlite => Ok(Expr::cust_with_exprs(
			"vec_distance_cosine($1, $2)",
			[
				SimpleExpr::Column(column),
				Expr::value(vector_literal.to_owned()),
			],
		)),
		DatabaseBackend::Postgres => Ok(Expr::cust_with_exprs(
			"($1)::vector <=> ($2)::vector",
			[
				SimpleExpr::Column(column),
				Expr::value(vector_literal.to_owned()),
			],
		)),
		other => Err(QueryError::UnsupportedBackend(format!("{other:?}"))),
	}
}
