//! Composite filter semantics

mod helpers;

use curator_core::common::QueryError;
use curator_core::metadata::MetadataPredicate;
use curator_core::query::{
	annotations, groups, samples, AnnotationFilter, CompareOp, GroupFilter, SampleFilter,
	VideoFilter,
};
use helpers::*;
use pretty_assertions::assert_eq;
use sea_orm::DatabaseBackend;

async fn sample_ids(
	conn: &sea_orm::DatabaseConnection,
	filter: SampleFilter,
) -> Vec<i32> {
	filter
		.apply(samples(DatabaseBackend::Sqlite))
		.unwrap()
		.to_list(conn)
		.await
		.unwrap()
		.iter()
		.map(|s| s.id)
		.collect()
}

#[tokio::test]
async fn annotation_label_policy() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "labels").await;

	let labeled = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let unlabeled = seed_sample(&conn, dataset.id, SampleSpec::default()).await;

	let cat = seed_label(&conn, dataset.id, "cat").await;
	annotate(&conn, labeled.id, cat.id).await;

	// labels=[cat], include_unannotated=false -> labeled only
	let got = sample_ids(
		&conn,
		SampleFilter {
			label_ids: Some(vec![cat.id]),
			include_unannotated: false,
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![labeled.id]);

	// labels=[cat], include_unannotated=true -> labeled plus unlabeled
	let got = sample_ids(
		&conn,
		SampleFilter {
			label_ids: Some(vec![cat.id]),
			include_unannotated: true,
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![labeled.id, unlabeled.id]);

	// labels=None -> no filtering regardless of the policy flag
	for include_unannotated in [false, true] {
		let got = sample_ids(
			&conn,
			SampleFilter {
				label_ids: None,
				include_unannotated,
				..Default::default()
			},
		)
		.await;
		assert_eq!(got, vec![labeled.id, unlabeled.id]);
	}
}

#[tokio::test]
async fn empty_label_list_normalizes_unless_preserved() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "empty-labels").await;

	let labeled = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let unlabeled = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let cat = seed_label(&conn, dataset.id, "cat").await;
	annotate(&conn, labeled.id, cat.id).await;

	// Default: Some([]) folds to None -> no filter.
	let got = sample_ids(
		&conn,
		SampleFilter {
			label_ids: Some(vec![]),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![labeled.id, unlabeled.id]);

	// Preserved: Some([]) matches nothing.
	let got = sample_ids(
		&conn,
		SampleFilter {
			label_ids: Some(vec![]),
			..Default::default()
		}
		.preserve_empty_labels(),
	)
	.await;
	assert_eq!(got, Vec::<i32>::new());

	// Preserved empty list plus the unannotated policy: only unlabeled.
	let got = sample_ids(
		&conn,
		SampleFilter {
			label_ids: Some(vec![]),
			include_unannotated: true,
			..Default::default()
		}
		.preserve_empty_labels(),
	)
	.await;
	assert_eq!(got, vec![unlabeled.id]);
}

#[tokio::test]
async fn tag_membership_deduplicates() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "tag-filter").await;

	let both = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let plain = seed_sample(&conn, dataset.id, SampleSpec::default()).await;

	let beach = seed_tag(&conn, dataset.id, "beach").await;
	let sunset = seed_tag(&conn, dataset.id, "sunset").await;
	attach_tag(&conn, both.id, beach.id).await;
	attach_tag(&conn, both.id, sunset.id).await;

	// A sample matching several requested tags still appears once.
	let got = sample_ids(
		&conn,
		SampleFilter {
			tag_ids: Some(vec![beach.id, sunset.id]),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![both.id]);

	let got = sample_ids(
		&conn,
		SampleFilter {
			tag_ids: Some(vec![sunset.id]),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![both.id]);
	assert!(!got.contains(&plain.id));
}

#[tokio::test]
async fn scope_sample_set_and_dimensions() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "scope").await;
	let other = seed_dataset(&conn, "other").await;

	let small = seed_sample(
		&conn,
		dataset.id,
		SampleSpec {
			width: Some(320),
			height: Some(240),
			..Default::default()
		},
	)
	.await;
	let big = seed_sample(
		&conn,
		dataset.id,
		SampleSpec {
			width: Some(1920),
			height: Some(1080),
			..Default::default()
		},
	)
	.await;
	let elsewhere = seed_sample(&conn, other.id, SampleSpec::default()).await;

	let got = sample_ids(
		&conn,
		SampleFilter {
			dataset_id: Some(dataset.id),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![small.id, big.id]);

	let got = sample_ids(
		&conn,
		SampleFilter {
			sample_uuids: Some(vec![big.uuid, elsewhere.uuid]),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![big.id, elsewhere.id]);

	let got = sample_ids(
		&conn,
		SampleFilter {
			dataset_id: Some(dataset.id),
			min_width: Some(1000),
			min_height: Some(720),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![big.id]);

	let got = sample_ids(
		&conn,
		SampleFilter {
			dataset_id: Some(dataset.id),
			max_width: Some(1000),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![small.id]);
}

#[tokio::test]
async fn caption_existence_filters() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "captions").await;

	let captioned = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let silent = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	add_caption(&conn, captioned.id, "a dog on a beach").await;

	let got = sample_ids(
		&conn,
		SampleFilter {
			has_captions: Some(true),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![captioned.id]);

	let got = sample_ids(
		&conn,
		SampleFilter {
			has_captions: Some(false),
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![silent.id]);
}

#[tokio::test]
async fn metadata_predicates_join_the_side_table() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "metadata-filter").await;

	let outdoor = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let indoor = seed_sample(&conn, dataset.id, SampleSpec::default()).await;

	curator_core::metadata::MetadataStore::set(
		&conn,
		dataset.id,
		outdoor.id,
		"scene",
		curator_core::metadata::MetadataValue::from("outdoor"),
	)
	.await
	.unwrap();
	curator_core::metadata::MetadataStore::set(
		&conn,
		dataset.id,
		indoor.id,
		"scene",
		curator_core::metadata::MetadataValue::from("indoor"),
	)
	.await
	.unwrap();

	let got = sample_ids(
		&conn,
		SampleFilter {
			metadata: vec![MetadataPredicate::new("scene", CompareOp::Eq, "outdoor").unwrap()],
			..Default::default()
		},
	)
	.await;
	assert_eq!(got, vec![outdoor.id]);
}

#[tokio::test]
async fn video_filter_narrows_on_video_properties() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "videos").await;

	let image = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let short = seed_sample(
		&conn,
		dataset.id,
		SampleSpec {
			media_kind: "video",
			..Default::default()
		},
	)
	.await;
	let long = seed_sample(
		&conn,
		dataset.id,
		SampleSpec {
			media_kind: "video",
			..Default::default()
		},
	)
	.await;
	add_video_data(&conn, short.id, 5_000, 150).await;
	add_video_data(&conn, long.id, 120_000, 3_600).await;

	let got = VideoFilter::default()
		.apply(samples(DatabaseBackend::Sqlite))
		.unwrap()
		.to_list(&conn)
		.await
		.unwrap();
	let ids: Vec<i32> = got.iter().map(|s| s.id).collect();
	assert_eq!(ids, vec![short.id, long.id]);
	assert!(!ids.contains(&image.id));

	let got = VideoFilter {
		min_duration_ms: Some(60_000),
		..Default::default()
	}
	.apply(samples(DatabaseBackend::Sqlite))
	.unwrap()
	.to_list(&conn)
	.await
	.unwrap();
	assert_eq!(got.iter().map(|s| s.id).collect::<Vec<_>>(), vec![long.id]);

	let got = VideoFilter {
		max_duration_ms: Some(60_000),
		min_frame_count: Some(100),
		..Default::default()
	}
	.apply(samples(DatabaseBackend::Sqlite))
	.unwrap()
	.to_list(&conn)
	.await
	.unwrap();
	assert_eq!(got.iter().map(|s| s.id).collect::<Vec<_>>(), vec![short.id]);
}

#[tokio::test]
async fn group_filter_requires_the_dataset() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "groups").await;

	let member = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let group = seed_group(&conn, dataset.id, "burst-1").await;
	let empty = seed_group(&conn, dataset.id, "burst-2").await;
	add_to_group(&conn, group.id, member.id).await;

	// Missing scope fails before any SQL is issued.
	let result = GroupFilter::default().apply(groups(DatabaseBackend::Sqlite));
	assert!(matches!(result, Err(QueryError::DatasetIdRequired)));

	let got = GroupFilter {
		dataset_id: Some(dataset.id),
		containing_sample_uuids: Some(vec![member.uuid]),
		..Default::default()
	}
	.apply(groups(DatabaseBackend::Sqlite))
	.unwrap()
	.to_list(&conn)
	.await
	.unwrap();
	assert_eq!(got.iter().map(|g| g.id).collect::<Vec<_>>(), vec![group.id]);

	let got = GroupFilter {
		dataset_id: Some(dataset.id),
		..Default::default()
	}
	.apply(groups(DatabaseBackend::Sqlite))
	.unwrap()
	.to_list(&conn)
	.await
	.unwrap();
	assert_eq!(
		got.iter().map(|g| g.id).collect::<Vec<_>>(),
		vec![group.id, empty.id]
	);
}

#[tokio::test]
async fn annotation_filter_scopes_and_narrows() {
	let conn = memory_db().await;
	let dataset = seed_dataset(&conn, "ann-filter").await;
	let other = seed_dataset(&conn, "ann-other").await;

	let here = seed_sample(&conn, dataset.id, SampleSpec::default()).await;
	let there = seed_sample(&conn, other.id, SampleSpec::default()).await;

	let cat = seed_label(&conn, dataset.id, "cat").await;
	let dog = seed_label(&conn, dataset.id, "dog").await;
	let a1 = annotate(&conn, here.id, cat.id).await;
	let _a2 = annotate(&conn, here.id, dog.id).await;
	let _a3 = annotate(&conn, there.id, cat.id).await;

	let got = AnnotationFilter {
		dataset_id: Some(dataset.id),
		label_ids: Some(vec![cat.id]),
		..Default::default()
	}
	.apply(annotations(DatabaseBackend::Sqlite))
	.unwrap()
	.to_list(&conn)
	.await
	.unwrap();
	assert_eq!(got.iter().map(|a| a.id).collect::<Vec<_>>(), vec![a1.id]);

	let got = AnnotationFilter {
		sample_uuids: Some(vec![here.uuid]),
		..Default::default()
	}
	.apply(annotations(DatabaseBackend::Sqlite))
	.unwrap()
	.to_list(&conn)
	.await
	.unwrap();
	assert_eq!(got.len(), 2);

	let got = AnnotationFilter {
		kinds: Some(vec!["bbox".to_owned()]),
		..Default::default()
	}
	.apply(annotations(DatabaseBackend::Sqlite))
	.unwrap()
	.to_list(&conn)
	.await
	.unwrap();
	assert_eq!(got.len(), 0);
}
