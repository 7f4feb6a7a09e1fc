//! SeaORM entities for the curation schema

pub mod annotation;
pub mod annotation_label;
pub mod caption;
pub mod dataset;
pub mod group_sample;
pub mod metadata_key;
pub mod projection_cache;
pub mod sample;
pub mod sample_embedding;
pub mod sample_group;
pub mod sample_metadata;
pub mod sample_tag;
pub mod tag;
pub mod video_data;
