//! Similarity listing
//!
//! Orders a dataset's samples by cosine distance between their stored
//! embedding and a probe vector. Used both for text-to-embedding ranking
//! (probe = encoded query text) and for nearest-neighbour browsing
//! (probe = another sample's embedding).

use crate::common::{CoreError, QueryError};
use crate::infra::db::entities::{sample, sample_embedding};
use crate::query::expression::DistanceExpression;
use sea_orm::sea_query::Order;
use sea_orm::{
	ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
	RelationTrait,
};

/// The `limit` nearest samples to `probe` within a dataset.
///
/// The dataset id is mandatory: without the scope the join would rank every
/// embedding in the library, which is never what an adjacency view wants.
pub async fn similar_samples<C: ConnectionTrait>(
	conn: &C,
	dataset_id: Option<i32>,
	model_id: &str,
	probe: &[f32],
	limit: u64,
) -> Result<Vec<sample::Model>, CoreError> {
	let dataset_id = dataset_id.ok_or(QueryError::DatasetIdRequired)?;
	let backend = conn.get_database_backend();

	let distance = DistanceExpression::to_embedding(probe.to_vec());

	let rows = sample::Entity::find()
		.join(JoinType::InnerJoin, sample::Relation::Embeddings.def())
		.filter(sample::Column::DatasetId.eq(dataset_id))
		.filter(sample_embedding::Column::ModelId.eq(model_id))
		.order_by(distance.compile(backend)?, Order::Asc)
		.limit(limit)
		.all(conn)
		.await?;

	Ok(rows)
}
