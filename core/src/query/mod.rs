//! Query compilation: field descriptors, the boolean expression algebra,
//! composite filters and the query builder

pub mod builder;
pub mod expression;
pub mod field;
pub mod filter;
pub mod similarity;

pub use builder::{annotations, groups, samples, QueryBuilder, QueryTarget};
pub use expression::{DistanceExpression, Expression};
pub use field::{
	annotation_fields, sample_fields, video_fields, CompareOp, Field, FieldKind, MetadataField,
};
pub use filter::{AnnotationFilter, GroupFilter, SampleFilter, VideoFilter};
pub use similarity::similar_samples;
