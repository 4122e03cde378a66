// tests/pipeline_fetch.rs — fetch-next behavior against the ledger and
// the single-slot staging buffer.

mod common;

use article_relay::RelayError;
use common::*;

#[tokio::test]
async fn first_candidate_is_staged() {
    let (mut pipeline, _dir) = pipeline_with(
        Box::new(StaticIndex(vec![
            "https://source.test/a".into(),
            "https://source.test/b".into(),
        ])),
        Box::new(MockFetcher::ok()),
        Box::new(PrefixTranslator),
        Box::new(MockPublisher::ok()),
        &[],
    );

    let outcome = pipeline.fetch_next().await.unwrap();
    assert_eq!(outcome.staged, "https://source.test/a");
    assert_eq!(outcome.title, "T");
    assert!(outcome.discarded.is_none());
    assert_eq!(
        pipeline.staged().unwrap().source_id,
        "https://source.test/a"
    );
}

#[tokio::test]
async fn ledger_entries_are_skipped() {
    // Ledger = {"a"}; the catalog still lists "a" first.
    let (mut pipeline, _dir) = pipeline_with(
        Box::new(StaticIndex(vec![
            "https://source.test/a".into(),
            "https://source.test/b".into(),
        ])),
        Box::new(MockFetcher::ok()),
        Box::new(PrefixTranslator),
        Box::new(MockPublisher::ok()),
        &["https://source.test/a"],
    );

    let outcome = pipeline.fetch_next().await.unwrap();
    assert_eq!(outcome.staged, "https://source.test/b");
}

#[tokio::test]
async fn refetch_replaces_and_reports_the_discarded_candidate() {
    // The index gains a newer entry between the two commands.
    let (mut pipeline, _dir) = pipeline_with(
        Box::new(SequenceIndex::new(vec![
            vec!["https://source.test/a"],
            vec!["https://source.test/b", "https://source.test/a"],
        ])),
        Box::new(MockFetcher::ok()),
        Box::new(PrefixTranslator),
        Box::new(MockPublisher::ok()),
        &[],
    );

    pipeline.fetch_next().await.unwrap();
    let second = pipeline.fetch_next().await.unwrap();
    assert_eq!(second.staged, "https://source.test/b");
    assert_eq!(second.discarded.as_deref(), Some("https://source.test/a"));
    assert_eq!(
        pipeline.staged().unwrap().source_id,
        "https://source.test/b"
    );
}

#[tokio::test]
async fn all_caught_up_is_no_candidate_and_leaves_the_buffer_alone() {
    let (mut pipeline, _dir) = pipeline_with(
        Box::new(SequenceIndex::new(vec![
            vec!["https://source.test/c"],
            vec!["https://source.test/a", "https://source.test/b"],
        ])),
        Box::new(MockFetcher::ok()),
        Box::new(PrefixTranslator),
        Box::new(MockPublisher::ok()),
        &["https://source.test/a", "https://source.test/b"],
    );

    pipeline.fetch_next().await.unwrap();
    let err = pipeline.fetch_next().await.unwrap_err();
    assert!(matches!(err, RelayError::NoCandidate));
    // previously staged candidate is untouched
    assert_eq!(
        pipeline.staged().unwrap().source_id,
        "https://source.test/c"
    );
}

#[tokio::test]
async fn failed_extraction_leaves_the_buffer_as_it_was() {
    let (mut pipeline, _dir) = pipeline_with(
        Box::new(SequenceIndex::new(vec![
            vec!["https://source.test/a"],
            vec!["https://source.test/broken", "https://source.test/a"],
        ])),
        Box::new(MockFetcher {
            missing_cover: vec!["https://source.test/broken".into()],
        }),
        Box::new(PrefixTranslator),
        Box::new(MockPublisher::ok()),
        &[],
    );

    pipeline.fetch_next().await.unwrap();
    let err = pipeline.fetch_next().await.unwrap_err();
    assert!(matches!(err, RelayError::Extraction { field: "cover" }));
    assert_eq!(
        pipeline.staged().unwrap().source_id,
        "https://source.test/a"
    );
}

#[tokio::test]
async fn unreachable_index_surfaces_catalog_fetch() {
    let (mut pipeline, _dir) = pipeline_with(
        Box::new(BrokenIndex),
        Box::new(MockFetcher::ok()),
        Box::new(PrefixTranslator),
        Box::new(MockPublisher::ok()),
        &[],
    );

    let err = pipeline.fetch_next().await.unwrap_err();
    assert!(matches!(err, RelayError::CatalogFetch(_)));
    assert!(pipeline.staged().is_none());
}
