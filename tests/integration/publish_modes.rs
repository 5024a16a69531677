//! Reset/append mode semantics and scratch retention policies.

use pdfpile::{
    AddOptions, DocumentProducer, LocalStorage, PdfPile, PileConfig, PublishMode, ScratchPolicy,
};
use rstest::rstest;

use crate::common::{destination_marks, marked_document, seed_destination};

use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn reset_discards_prior_destination_content() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");
    seed_destination(&destination, &[7, 8, 9]);

    let mut pile = PdfPile::new(&destination).unwrap();
    pile.add_page(
        &mut DocumentProducer::new(marked_document(&[1, 2])),
        AddOptions::deferred(),
    )
    .await
    .unwrap();
    pile.publish(PublishMode::Reset).await.unwrap();

    assert_eq!(destination_marks(&destination), vec![1, 2]);
}

#[tokio::test]
async fn append_yields_old_plus_new_page_counts() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");
    seed_destination(&destination, &[7, 8]);

    let mut pile = PdfPile::new(&destination).unwrap();
    pile.add_page(
        &mut DocumentProducer::new(marked_document(&[1, 2, 3])),
        AddOptions::deferred(),
    )
    .await
    .unwrap();
    let stats = pile.publish(PublishMode::Append).await.unwrap().unwrap();

    assert_eq!(stats.total_pages, 5);
    assert_eq!(destination_marks(&destination), vec![7, 8, 1, 2, 3]);
}

#[rstest]
#[case::reset(PublishMode::Reset)]
#[case::append(PublishMode::Append)]
#[tokio::test]
async fn missing_destination_is_created_from_scratch_content(#[case] mode: PublishMode) {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");

    let mut pile = PdfPile::new(&destination).unwrap();
    pile.add_page(
        &mut DocumentProducer::new(marked_document(&[1, 2])),
        AddOptions::deferred(),
    )
    .await
    .unwrap();
    pile.publish(mode).await.unwrap();

    assert_eq!(destination_marks(&destination), vec![1, 2]);
}

#[rstest]
#[case::retained(ScratchPolicy::Retain, vec![1, 1])]
#[case::cleared(ScratchPolicy::ClearAfterPublish, vec![1])]
#[tokio::test]
async fn scratch_policy_governs_republish(
    #[case] policy: ScratchPolicy,
    #[case] expected_after_second: Vec<i64>,
) {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");
    let config = PileConfig {
        scratch_policy: policy,
        ..PileConfig::default()
    };

    let mut pile =
        PdfPile::with_storage(&destination, Arc::new(LocalStorage::new()), config).unwrap();
    pile.add_page(
        &mut DocumentProducer::new(marked_document(&[1])),
        AddOptions::deferred(),
    )
    .await
    .unwrap();
    pile.publish(PublishMode::Reset).await.unwrap();
    assert_eq!(destination_marks(&destination), vec![1]);

    pile.publish(PublishMode::Append).await.unwrap();
    assert_eq!(destination_marks(&destination), expected_after_second);
}

#[tokio::test]
async fn cleared_scratch_only_ships_pages_added_since_last_publish() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");
    let config = PileConfig {
        scratch_policy: ScratchPolicy::ClearAfterPublish,
        ..PileConfig::default()
    };

    let mut pile =
        PdfPile::with_storage(&destination, Arc::new(LocalStorage::new()), config).unwrap();
    pile.add_document(marked_document(&[1])).await.unwrap();
    pile.add_document(marked_document(&[2])).await.unwrap();
    pile.add_document(marked_document(&[3])).await.unwrap();

    assert_eq!(destination_marks(&destination), vec![1, 2, 3]);
    assert_eq!(pile.pending_pages(), 0);
}

#[tokio::test]
async fn force_reset_overrides_append_default() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");

    let mut pile = PdfPile::new(&destination).unwrap();
    pile.add_document(marked_document(&[1])).await.unwrap();
    assert_eq!(destination_marks(&destination), vec![1]);

    // Retained scratch is [1, 2]; a forced reset replaces the destination
    // with exactly that.
    pile.add_page(
        &mut DocumentProducer::new(marked_document(&[2])),
        AddOptions {
            publish_now: true,
            force_reset: true,
        },
    )
    .await
    .unwrap();

    assert_eq!(destination_marks(&destination), vec![1, 2]);
}
