//! Composite filters
//!
//! Unlike expressions, composite filters are plain records of optional
//! constraints that are ANDed implicitly; an absent field means no
//! constraint. They are constructed per request, applied once to a base
//! query, and discarded.
//!
//! Constraints are applied in a fixed order to keep join duplication down:
//! scope id, explicit sample membership, annotation-label policy, tag
//! membership, metadata predicates, then derived-property and dimension
//! checks.

use crate::common::QueryError;
use crate::infra::db::entities::{
	annotation, caption, group_sample, sample, sample_group, sample_tag, video_data,
};
use crate::metadata::MetadataPredicate;
use crate::query::builder::QueryBuilder;
use crate::query::expression::Expression;
use crate::query::field::MetadataField;
use sea_orm::sea_query::{Expr, ExprTrait, Query as SeaQuery, SimpleExpr};
use uuid::Uuid;

/// Filter over samples.
#[derive(Debug, Clone)]
pub struct SampleFilter {
	pub dataset_id: Option<i32>,
	pub sample_uuids: Option<Vec<Uuid>>,
	/// `None` means no label filtering at all, regardless of
	/// `include_unannotated`. A non-empty list matches samples carrying at
	/// least one of the labels.
	pub label_ids: Option<Vec<i32>>,
	/// Also match samples with no annotations when label filtering is
	/// active.
	pub include_unannotated: bool,
	pub tag_ids: Option<Vec<i32>>,
	pub metadata: Vec<MetadataPredicate>,
	pub has_captions: Option<bool>,
	pub min_width: Option<i32>,
	pub max_width: Option<i32>,
	pub min_height: Option<i32>,
	pub max_height: Option<i32>,
	pub normalize_empty_labels: bool,
}

impl Default for SampleFilter {
	fn default() -> Self {
		Self {
			dataset_id: None,
			sample_uuids: None,
			label_ids: None,
			include_unannotated: false,
			tag_ids: None,
			metadata: Vec::new(),
			has_captions: None,
			min_width: None,
			max_width: None,
			min_height: None,
			max_height: None,
			normalize_empty_labels: true,
		}
	}
}

impl SampleFilter {
	/// Keep an explicitly empty label list as "matches nothing" instead of
	/// folding it to "no filter". Needed by callers that must distinguish
	/// the two.
	pub fn preserve_empty_labels(mut self) -> Self {
		self.normalize_empty_labels = false;
		self
	}

	/// Narrow `query` by every present constraint.
	pub fn apply(
		self,
		mut query: QueryBuilder<sample::Entity>,
	) -> Result<QueryBuilder<sample::Entity>, QueryError> {
		let backend = query.backend();

		if let Some(dataset_id) = self.dataset_id {
			query = query
				.also_filter(Expr::col((sample::Entity, sample::Column::DatasetId)).eq(dataset_id));
		}

		if let Some(uuids) = &self.sample_uuids {
			query = query.also_filter(
				Expr::col((sample::Entity, sample::Column::Uuid)).is_in(uuids.iter().copied()),
			);
		}

		let labels = match (self.label_ids, self.normalize_empty_labels) {
			(Some(ids), true) if ids.is_empty() => None,
			(labels, _) => labels,
		};
		if let Some(ids) = labels {
			query = query.also_filter(label_membership(&ids, self.include_unannotated));
		}

		if let Some(tag_ids) = &self.tag_ids {
			query = query.also_filter(tag_membership(tag_ids));
		}

		for predicate in &self.metadata {
			query = query.also_filter(compile_metadata_predicate(predicate, backend)?);
		}

		if let Some(has) = self.has_captions {
			query = query.also_filter(caption_existence(has));
		}

		if let Some(min) = self.min_width {
			query = query
				.also_filter(Expr::col((sample::Entity, sample::Column::Width)).gte(min));
		}
		if let Some(max) = self.max_width {
			query = query
				.also_filter(Expr::col((sample::Entity, sample::Column::Width)).lte(max));
		}
		if let Some(min) = self.min_height {
			query = query
				.also_filter(Expr::col((sample::Entity, sample::Column::Height)).gte(min));
		}
		if let Some(max) = self.max_height {
			query = query
				.also_filter(Expr::col((sample::Entity, sample::Column::Height)).lte(max));
		}

		Ok(query)
	}
}

/// Filter over annotations.
#[derive(Debug, Clone, Default)]
pub struct AnnotationFilter {
	pub dataset_id: Option<i32>,
	pub sample_uuids: Option<Vec<Uuid>>,
	pub label_ids: Option<Vec<i32>>,
	pub kinds: Option<Vec<String>>,
}

impl AnnotationFilter {
	pub fn apply(
		self,
		mut query: QueryBuilder<annotation::Entity>,
	) -> Result<QueryBuilder<annotation::Entity>, QueryError> {
		if let Some(dataset_id) = self.dataset_id {
			let sub = SeaQuery::select()
				.column((sample::Entity, sample::Column::Id))
				.from(sample::Entity)
				.and_where(
					Expr::col((sample::Entity, sample::Column::DatasetId)).eq(dataset_id),
				)
				.to_owned();
			query = query.also_filter(
				Expr::col((annotation::Entity, annotation::Column::SampleId)).in_subquery(sub),
			);
		}

		if let Some(uuids) = &self.sample_uuids {
			let sub = SeaQuery::select()
				.column((sample::Entity, sample::Column::Id))
				.from(sample::Entity)
				.and_where(
					Expr::col((sample::Entity, sample::Column::Uuid))
						.is_in(uuids.iter().copied()),
				)
				.to_owned();
			query = query.also_filter(
				Expr::col((annotation::Entity, annotation::Column::SampleId)).in_subquery(sub),
			);
		}

		if let Some(label_ids) = &self.label_ids {
			query = query.also_filter(
				Expr::col((annotation::Entity, annotation::Column::LabelId))
					.is_in(label_ids.iter().copied()),
			);
		}

		if let Some(kinds) = &self.kinds {
			query = query.also_filter(
				Expr::col((annotation::Entity, annotation::Column::Kind))
					.is_in(kinds.iter().cloned()),
			);
		}

		Ok(query)
	}
}

/// Filter over sample groups. Groups are meaningless without their dataset,
/// so the scope id is mandatory here.
#[derive(Debug, Clone, Default)]
pub struct GroupFilter {
	pub dataset_id: Option<i32>,
	pub group_uuids: Option<Vec<Uuid>>,
	/// Match groups containing at least one of these samples.
	pub containing_sample_uuids: Option<Vec<Uuid>>,
	pub name: Option<String>,
}

impl GroupFilter {
	pub fn apply(
		self,
		mut query: QueryBuilder<sample_group::Entity>,
	) -> Result<QueryBuilder<sample_group::Entity>, QueryError> {
		let dataset_id = self.dataset_id.ok_or(QueryError::DatasetIdRequired)?;

		query = query.also_filter(
			Expr::col((sample_group::Entity, sample_group::Column::DatasetId)).eq(dataset_id),
		);

		if let Some(uuids) = &self.group_uuids {
			query = query.also_filter(
				Expr::col((sample_group::Entity, sample_group::Column::Uuid))
					.is_in(uuids.iter().copied()),
			);
		}

		if let Some(uuids) = &self.containing_sample_uuids {
			let sub = SeaQuery::select()
				.expr(Expr::value(1))
				.from(group_sample::Entity)
				.inner_join(
					sample::Entity,
					Expr::col((sample::Entity, sample::Column::Id))
						.equals((group_sample::Entity, group_sample::Column::SampleId)),
				)
				.and_where(
					Expr::col((group_sample::Entity, group_sample::Column::GroupId))
						.equals((sample_group::Entity, sample_group::Column::Id)),
				)
				.and_where(
					Expr::col((sample::Entity, sample::Column::Uuid))
						.is_in(uuids.iter().copied()),
				)
				.to_owned();
			query = query.also_filter(Expr::exists(sub));
		}

		if let Some(name) = &self.name {
			query = query.also_filter(
				Expr::col((sample_group::Entity, sample_group::Column::Name)).eq(name.clone()),
			);
		}

		Ok(query)
	}
}

/// Filter over video samples. Applies on top of the sample table and narrows
/// to rows with video data.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
	pub dataset_id: Option<i32>,
	pub tag_ids: Option<Vec<i32>>,
	pub min_duration_ms: Option<i64>,
	pub max_duration_ms: Option<i64>,
	pub min_frame_count: Option<i32>,
	pub has_captions: Option<bool>,
}

impl VideoFilter {
	pub fn apply(
		self,
		mut query: QueryBuilder<sample::Entity>,
	) -> Result<QueryBuilder<sample::Entity>, QueryError> {
		query = query.also_filter(
			Expr::col((sample::Entity, sample::Column::MediaKind)).eq("video"),
		);

		if let Some(dataset_id) = self.dataset_id {
			query = query
				.also_filter(Expr::col((sample::Entity, sample::Column::DatasetId)).eq(dataset_id));
		}

		if let Some(tag_ids) = &self.tag_ids {
			query = query.also_filter(tag_membership(tag_ids));
		}

		let mut video_predicates = Vec::new();
		if let Some(min) = self.min_duration_ms {
			video_predicates
				.push(Expr::col((video_data::Entity, video_data::Column::DurationMs)).gte(min));
		}
		if let Some(max) = self.max_duration_ms {
			video_predicates
				.push(Expr::col((video_data::Entity, video_data::Column::DurationMs)).lte(max));
		}
		if let Some(min) = self.min_frame_count {
			video_predicates
				.push(Expr::col((video_data::Entity, video_data::Column::FrameCount)).gte(min));
		}
		if !video_predicates.is_empty() {
			let mut sub = SeaQuery::select()
				.expr(Expr::value(1))
				.from(video_data::Entity)
				.and_where(
					Expr::col((video_data::Entity, video_data::Column::SampleId))
						.equals((sample::Entity, sample::Column::Id)),
				)
				.to_owned();
			for predicate in video_predicates {
				sub.and_where(predicate);
			}
			query = query.also_filter(Expr::exists(sub));
		}

		if let Some(has) = self.has_captions {
			query = query.also_filter(caption_existence(has));
		}

		Ok(query)
	}
}

/// Samples carrying at least one of `label_ids`, plus unannotated samples
/// when the policy asks for them.
fn label_membership(label_ids: &[i32], include_unannotated: bool) -> SimpleExpr {
	let labeled_sub = SeaQuery::select()
		.distinct()
		.column((annotation::Entity, annotation::Column::SampleId))
		.from(annotation::Entity)
		.and_where(
			Expr::col((annotation::Entity, annotation::Column::LabelId))
				.is_in(label_ids.iter().copied()),
		)
		.to_owned();

	let labeled =
		Expr::col((sample::Entity, sample::Column::Id)).in_subquery(labeled_sub);

	if include_unannotated {
		let any_annotation = SeaQuery::select()
			.expr(Expr::value(1))
			.from(annotation::Entity)
			.and_where(
				Expr::col((annotation::Entity, annotation::Column::SampleId))
					.equals((sample::Entity, sample::Column::Id)),
			)
			.to_owned();
		labeled.or(Expr::exists(any_annotation).not())
	} else {
		labeled
	}
}

/// Deduplicated tag-membership subquery.
fn tag_membership(tag_ids: &[i32]) -> SimpleExpr {
	let sub = SeaQuery::select()
		.distinct()
		.column((sample_tag::Entity, sample_tag::Column::SampleId))
		.from(sample_tag::Entity)
		.and_where(
			Expr::col((sample_tag::Entity, sample_tag::Column::TagId))
				.is_in(tag_ids.iter().copied()),
		)
		.to_owned();

	Expr::col((sample::Entity, sample::Column::Id)).in_subquery(sub)
}

/// Existence (or absence) of captions for the sample.
fn caption_existence(has: bool) -> SimpleExpr {
	let sub = SeaQuery::select()
		.expr(Expr::value(1))
		.from(caption::Entity)
		.and_where(
			Expr::col((caption::Entity, caption::Column::SampleId))
				.equals((sample::Entity, sample::Column::Id)),
		)
		.to_owned();

	let exists = Expr::exists(sub);
	if has {
		exists
	} else {
		exists.not()
	}
}

fn compile_metadata_predicate(
	predicate: &MetadataPredicate,
	backend: sea_orm::DatabaseBackend,
) -> Result<SimpleExpr, QueryError> {
	let field = MetadataField::for_sample(predicate.path.clone());
	Expression::Metadata {
		field,
		op: predicate.op,
		value: predicate.value.clone(),
	}
	.compile(backend)
}
