//! Query builder
//!
//! A small stateful wrapper over a SeaORM `Select`. `matching` installs the
//! query's single predicate (a later call replaces the earlier one; callers
//! compose trees with `and`/`or` first), `order_by` may be used at most once
//! per builder, and execution without an explicit ordering falls back to a
//! deterministic default: ascending creation time, ties broken by ascending
//! id, so pagination stays stable.

use crate::common::{CoreError, QueryError, SortDirection};
use crate::infra::db::entities::{annotation, sample, sample_group};
use crate::query::expression::{DistanceExpression, Expression};
use sea_orm::sea_query::{Order, SimpleExpr};
use sea_orm::{
	ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, IntoSimpleExpr,
	PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, StreamTrait,
};

/// Entities the builder can execute against. Supplies the columns backing
/// the default ordering.
pub trait QueryTarget: EntityTrait {
	fn created_at_column() -> Self::Column;
	fn id_column() -> Self::Column;
}

impl QueryTarget for sample::Entity {
	fn created_at_column() -> Self::Column {
		sample::Column::CreatedAt
	}

	fn id_column() -> Self::Column {
		sample::Column::Id
	}
}

impl QueryTarget for annotation::Entity {
	fn created_at_column() -> Self::Column {
		annotation::Column::CreatedAt
	}

	fn id_column() -> Self::Column {
		annotation::Column::Id
	}
}

impl QueryTarget for sample_group::Entity {
	fn created_at_column() -> Self::Column {
		sample_group::Column::CreatedAt
	}

	fn id_column() -> Self::Column {
		sample_group::Column::Id
	}
}

pub struct QueryBuilder<E: QueryTarget> {
	select: Select<E>,
	backend: DatabaseBackend,
	predicate: Option<Expression>,
	ordering: Option<(SimpleExpr, Order)>,
	offset: Option<u64>,
	limit: Option<u64>,
}

impl<E: QueryTarget> QueryBuilder<E> {
	pub fn new(backend: DatabaseBackend) -> Self {
		Self {
			select: E::find(),
			backend,
			predicate: None,
			ordering: None,
			offset: None,
			limit: None,
		}
	}

	pub fn backend(&self) -> DatabaseBackend {
		self.backend
	}

	/// Install the query predicate. Calling this again replaces the previous
	/// predicate; combine expressions with `and`/`or` to narrow further.
	pub fn matching(mut self, expr: Expression) -> Self {
		self.predicate = Some(expr);
		self
	}

	/// Narrow the underlying select directly. Used by composite filters,
	/// which AND their constraints independently of `matching`.
	pub(crate) fn also_filter(mut self, expr: SimpleExpr) -> Self {
		self.select = self.select.filter(expr);
		self
	}

	/// Order by a field column. May be called at most once per builder;
	/// a second call is a programmer error, not a silent override.
	pub fn order_by(
		mut self,
		expr: impl IntoSimpleExpr,
		direction: SortDirection,
	) -> Result<Self, QueryError> {
		if self.ordering.is_some() {
			return Err(QueryError::OrderingAlreadySet);
		}
		self.ordering = Some((expr.into_simple_expr(), direction.into()));
		Ok(self)
	}

	/// Order by cosine distance to a probe vector (nearest first). Counts as
	/// the one permitted ordering.
	pub fn order_by_distance(self, distance: &DistanceExpression) -> Result<Self, QueryError> {
		let compiled = distance.compile(self.backend)?;
		self.order_by(compiled, SortDirection::Asc)
	}

	/// Attach pagination. Independent of ordering state.
	pub fn slice(mut self, offset: u64, limit: u64) -> Self {
		self.offset = Some(offset);
		self.limit = Some(limit);
		self
	}

	/// Resolve predicate, ordering and pagination into an executable select.
	fn into_select(self) -> Result<Select<E>, QueryError> {
		let mut select = self.select;

		if let Some(predicate) = &self.predicate {
			select = select.filter(predicate.compile(self.backend)?);
		}

		select = match self.ordering {
			Some((expr, order)) => select.order_by(expr, order),
			None => select
				.order_by(E::created_at_column(), Order::Asc)
				.order_by(E::id_column(), Order::Asc),
		};

		if let Some(offset) = self.offset {
			select = select.offset(offset);
		}
		if let Some(limit) = self.limit {
			select = select.limit(limit);
		}

		Ok(select)
	}

	/// Execute and collect. A fresh call re-executes the query.
	pub async fn to_list<C: ConnectionTrait>(self, conn: &C) -> Result<Vec<E::Model>, CoreError> {
		Ok(self.into_select()?.all(conn).await?)
	}

	/// Execute and stream rows without collecting them.
	pub async fn stream<'a, C>(
		self,
		conn: &'a C,
	) -> Result<
		impl futures::Stream<Item = Result<E::Model, sea_orm::DbErr>> + Send + 'a,
		CoreError,
	>
	where
		C: ConnectionTrait + StreamTrait + Send,
		E::Model: Send,
	{
		Ok(self.into_select()?.stream(conn).await?)
	}

	/// Count matching rows, ignoring pagination.
	pub async fn count(self, conn: &DatabaseConnection) -> Result<u64, CoreError>
	where
		E::Model: Send + Sync,
	{
		let mut select = self.select;
		if let Some(predicate) = &self.predicate {
			select = select.filter(predicate.compile(self.backend)?);
		}
		Ok(select.count(conn).await?)
	}
}

/// Builder over the sample table.
pub fn samples(backend: DatabaseBackend) -> QueryBuilder<sample::Entity> {
	QueryBuilder::new(backend)
}

/// Builder over the annotation table.
pub fn annotations(backend: DatabaseBackend) -> QueryBuilder<annotation::Entity> {
	QueryBuilder::new(backend)
}

/// Builder over the sample-group table.
pub fn groups(backend: DatabaseBackend) -> QueryBuilder<sample_group::Entity> {
	QueryBuilder::new(backend)
}
