//! Initial database schema for the curation core
//!
//! Creates the dataset/sample hierarchy, tagging and annotation tables, the
//! metadata side tables, and the embedding + projection cache tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
	async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		// Create dataset table
		manager
			.create_table(
				Table::create()
					.table(Dataset::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Dataset::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Dataset::Uuid).uuid().not_null().unique_key())
					.col(ColumnDef::new(Dataset::Name).string().not_null())
					.col(ColumnDef::new(Dataset::Description).string())
					.col(
						ColumnDef::new(Dataset::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.col(
						ColumnDef::new(Dataset::UpdatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.to_owned(),
			)
			.await?;

		// Create sample table
		manager
			.create_table(
				Table::create()
					.table(Sample::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Sample::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Sample::Uuid).uuid().not_null().unique_key())
					.col(ColumnDef::new(Sample::DatasetId).integer().not_null())
					.col(ColumnDef::new(Sample::FileName).string().not_null())
					.col(ColumnDef::new(Sample::MediaKind).string().not_null())
					.col(ColumnDef::new(Sample::Width).integer())
					.col(ColumnDef::new(Sample::Height).integer())
					.col(
						ColumnDef::new(Sample::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.col(
						ColumnDef::new(Sample::UpdatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(Sample::Table, Sample::DatasetId)
							.to(Dataset::Table, Dataset::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create video_data table
		manager
			.create_table(
				Table::create()
					.table(VideoData::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(VideoData::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(VideoData::SampleId)
							.integer()
							.not_null()
							.unique_key(),
					)
					.col(
						ColumnDef::new(VideoData::DurationMs)
							.big_integer()
							.not_null(),
					)
					.col(ColumnDef::new(VideoData::FrameCount).integer().not_null())
					.col(ColumnDef::new(VideoData::Fps).double())
					.foreign_key(
						ForeignKey::create()
							.from(VideoData::Table, VideoData::SampleId)
							.to(Sample::Table, Sample::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create caption table
		manager
			.create_table(
				Table::create()
					.table(Caption::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Caption::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Caption::Uuid).uuid().not_null().unique_key())
					.col(ColumnDef::new(Caption::SampleId).integer().not_null())
					.col(ColumnDef::new(Caption::Text).string().not_null())
					.col(
						ColumnDef::new(Caption::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(Caption::Table, Caption::SampleId)
							.to(Sample::Table, Sample::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create tag table
		manager
			.create_table(
				Table::create()
					.table(Tag::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Tag::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(Tag::Uuid).uuid().not_null().unique_key())
					.col(ColumnDef::new(Tag::DatasetId).integer().not_null())
					.col(ColumnDef::new(Tag::Name).string().not_null())
					.col(ColumnDef::new(Tag::Color).string())
					.col(
						ColumnDef::new(Tag::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(Tag::Table, Tag::DatasetId)
							.to(Dataset::Table, Dataset::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create sample_tag junction table
		manager
			.create_table(
				Table::create()
					.table(SampleTag::Table)
					.if_not_exists()
					.col(ColumnDef::new(SampleTag::SampleId).integer().not_null())
					.col(ColumnDef::new(SampleTag::TagId).integer().not_null())
					.primary_key(
						Index::create()
							.col(SampleTag::SampleId)
							.col(SampleTag::TagId),
					)
					.foreign_key(
						ForeignKey::create()
							.from(SampleTag::Table, SampleTag::SampleId)
							.to(Sample::Table, Sample::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.foreign_key(
						ForeignKey::create()
							.from(SampleTag::Table, SampleTag::TagId)
							.to(Tag::Table, Tag::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create annotation_label table
		manager
			.create_table(
				Table::create()
					.table(AnnotationLabel::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(AnnotationLabel::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(AnnotationLabel::Uuid)
							.uuid()
							.not_null()
							.unique_key(),
					)
					.col(
						ColumnDef::new(AnnotationLabel::DatasetId)
							.integer()
							.not_null(),
					)
					.col(ColumnDef::new(AnnotationLabel::Name).string().not_null())
					.col(
						ColumnDef::new(AnnotationLabel::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(AnnotationLabel::Table, AnnotationLabel::DatasetId)
							.to(Dataset::Table, Dataset::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create annotation table
		manager
			.create_table(
				Table::create()
					.table(Annotation::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(Annotation::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(Annotation::Uuid)
							.uuid()
							.not_null()
							.unique_key(),
					)
					.col(ColumnDef::new(Annotation::SampleId).integer().not_null())
					.col(ColumnDef::new(Annotation::LabelId).integer().not_null())
					.col(ColumnDef::new(Annotation::Kind).string().not_null())
					.col(ColumnDef::new(Annotation::Data).json().not_null())
					.col(
						ColumnDef::new(Annotation::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.col(
						ColumnDef::new(Annotation::UpdatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(Annotation::Table, Annotation::SampleId)
							.to(Sample::Table, Sample::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.foreign_key(
						ForeignKey::create()
							.from(Annotation::Table, Annotation::LabelId)
							.to(AnnotationLabel::Table, AnnotationLabel::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create sample_group table
		manager
			.create_table(
				Table::create()
					.table(SampleGroup::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(SampleGroup::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(SampleGroup::Uuid)
							.uuid()
							.not_null()
							.unique_key(),
					)
					.col(ColumnDef::new(SampleGroup::DatasetId).integer().not_null())
					.col(ColumnDef::new(SampleGroup::Name).string().not_null())
					.col(
						ColumnDef::new(SampleGroup::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(SampleGroup::Table, SampleGroup::DatasetId)
							.to(Dataset::Table, Dataset::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create group_sample junction table
		manager
			.create_table(
				Table::create()
					.table(GroupSample::Table)
					.if_not_exists()
					.col(ColumnDef::new(GroupSample::GroupId).integer().not_null())
					.col(ColumnDef::new(GroupSample::SampleId).integer().not_null())
					.primary_key(
						Index::create()
							.col(GroupSample::GroupId)
							.col(GroupSample::SampleId),
					)
					.foreign_key(
						ForeignKey::create()
							.from(GroupSample::Table, GroupSample::GroupId)
							.to(SampleGroup::Table, SampleGroup::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.foreign_key(
						ForeignKey::create()
							.from(GroupSample::Table, GroupSample::SampleId)
							.to(Sample::Table, Sample::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create sample_metadata table
		manager
			.create_table(
				Table::create()
					.table(SampleMetadata::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(SampleMetadata::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(SampleMetadata::SampleId)
							.integer()
							.not_null()
							.unique_key(),
					)
					.col(ColumnDef::new(SampleMetadata::Data).json().not_null())
					.col(
						ColumnDef::new(SampleMetadata::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.col(
						ColumnDef::new(SampleMetadata::UpdatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(SampleMetadata::Table, SampleMetadata::SampleId)
							.to(Sample::Table, Sample::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create metadata_key table
		manager
			.create_table(
				Table::create()
					.table(MetadataKey::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(MetadataKey::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(ColumnDef::new(MetadataKey::DatasetId).integer().not_null())
					.col(ColumnDef::new(MetadataKey::KeyPath).string().not_null())
					.col(ColumnDef::new(MetadataKey::Kind).string().not_null())
					.col(
						ColumnDef::new(MetadataKey::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(MetadataKey::Table, MetadataKey::DatasetId)
							.to(Dataset::Table, Dataset::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create sample_embedding table
		manager
			.create_table(
				Table::create()
					.table(SampleEmbedding::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(SampleEmbedding::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(SampleEmbedding::SampleId)
							.integer()
							.not_null(),
					)
					.col(ColumnDef::new(SampleEmbedding::ModelId).string().not_null())
					.col(ColumnDef::new(SampleEmbedding::Vector).text().not_null())
					.col(
						ColumnDef::new(SampleEmbedding::Fingerprint)
							.string()
							.not_null(),
					)
					.col(
						ColumnDef::new(SampleEmbedding::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.foreign_key(
						ForeignKey::create()
							.from(SampleEmbedding::Table, SampleEmbedding::SampleId)
							.to(Sample::Table, Sample::Id)
							.on_delete(ForeignKeyAction::Cascade),
					)
					.to_owned(),
			)
			.await?;

		// Create projection_cache table
		manager
			.create_table(
				Table::create()
					.table(ProjectionCache::Table)
					.if_not_exists()
					.col(
						ColumnDef::new(ProjectionCache::Id)
							.integer()
							.not_null()
							.auto_increment()
							.primary_key(),
					)
					.col(
						ColumnDef::new(ProjectionCache::CacheKey)
							.string()
							.not_null()
							.unique_key(),
					)
					.col(ColumnDef::new(ProjectionCache::ModelId).string().not_null())
					.col(
						ColumnDef::new(ProjectionCache::SampleCount)
							.integer()
							.not_null(),
					)
					.col(ColumnDef::new(ProjectionCache::Xs).json().not_null())
					.col(ColumnDef::new(ProjectionCache::Ys).json().not_null())
					.col(
						ColumnDef::new(ProjectionCache::CreatedAt)
							.timestamp_with_time_zone()
							.not_null(),
					)
					.to_owned(),
			)
			.await?;

		// Create indices for better query performance

		manager
			.create_index(
				Index::create()
					.name("idx_samples_dataset_created")
					.table(Sample::Table)
					.col(Sample::DatasetId)
					.col(Sample::CreatedAt)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_annotations_sample_id")
					.table(Annotation::Table)
					.col(Annotation::SampleId)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_annotations_label_id")
					.table(Annotation::Table)
					.col(Annotation::LabelId)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("idx_captions_sample_id")
					.table(Caption::Table)
					.col(Caption::SampleId)
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("uniq_tags_dataset_name")
					.table(Tag::Table)
					.col(Tag::DatasetId)
					.col(Tag::Name)
					.unique()
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("uniq_labels_dataset_name")
					.table(AnnotationLabel::Table)
					.col(AnnotationLabel::DatasetId)
					.col(AnnotationLabel::Name)
					.unique()
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("uniq_metadata_keys_dataset_path")
					.table(MetadataKey::Table)
					.col(MetadataKey::DatasetId)
					.col(MetadataKey::KeyPath)
					.unique()
					.to_owned(),
			)
			.await?;

		manager
			.create_index(
				Index::create()
					.name("uniq_embeddings_sample_model")
					.table(SampleEmbedding::Table)
					.col(SampleEmbedding::SampleId)
					.col(SampleEmbedding::ModelId)
					.unique()
					.to_owned(),
			)
			.await?;

		Ok(())
	}

	async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
		// Drop tables in reverse order of creation
		manager
			.drop_table(Table::drop().table(ProjectionCache::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(SampleEmbedding::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(MetadataKey::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(SampleMetadata::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(GroupSample::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(SampleGroup::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Annotation::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(AnnotationLabel::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(SampleTag::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Tag::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Caption::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(VideoData::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Sample::Table).to_owned())
			.await?;
		manager
			.drop_table(Table::drop().table(Dataset::Table).to_owned())
			.await?;

		Ok(())
	}
}

#[derive(DeriveIden)]
enum Dataset {
	Table,
	Id,
	Uuid,
	Name,
	Description,
	CreatedAt,
	UpdatedAt,
}

#[derive(DeriveIden)]
enum Sample {
	Table,
	Id,
	Uuid,
	DatasetId,
	FileName,
	MediaKind,
	Width,
	Height,
	CreatedAt,
	UpdatedAt,
}

#[derive(DeriveIden)]
enum VideoData {
	Table,
	Id,
	SampleId,
	DurationMs,
	FrameCount,
	Fps,
}

#[derive(DeriveIden)]
enum Caption {
	Table,
	Id,
	Uuid,
	SampleId,
	Text,
	CreatedAt,
}

#[derive(DeriveIden)]
enum Tag {
	Table,
	Id,
	Uuid,
	DatasetId,
	Name,
	Color,
	CreatedAt,
}

#[derive(DeriveIden)]
enum SampleTag {
	Table,
	SampleId,
	TagId,
}

#[derive(DeriveIden)]
enum AnnotationLabel {
	Table,
	Id,
	Uuid,
	DatasetId,
	Name,
	CreatedAt,
}

#[derive(DeriveIden)]
enum Annotation {
	Table,
	Id,
	Uuid,
	SampleId,
	LabelId,
	Kind,
	Data,
	CreatedAt,
	UpdatedAt,
}

#[derive(DeriveIden)]
enum SampleGroup {
	Table,
	Id,
	Uuid,
	DatasetId,
	Name,
	CreatedAt,
}

#[derive(DeriveIden)]
enum GroupSample {
	Table,
	GroupId,
	SampleId,
}

#[derive(DeriveIden)]
enum SampleMetadata {
	Table,
	Id,
	SampleId,
	Data,
	CreatedAt,
	UpdatedAt,
}

#[derive(DeriveIden)]
enum MetadataKey {
	Table,
	Id,
	DatasetId,
	KeyPath,
	Kind,
	CreatedAt,
}

#[derive(DeriveIden)]
enum SampleEmbedding {
	Table,
	Id,
	SampleId,
	ModelId,
	Vector,
	Fingerprint,
	CreatedAt,
}

#[derive(DeriveIden)]
enum ProjectionCache {
	Table,
	Id,
	CacheKey,
	ModelId,
	SampleCount,
	Xs,
	Ys,
	CreatedAt,
}
