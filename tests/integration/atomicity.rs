//! Atomicity under failure injection: a failed publish must leave the
//! destination byte-identical to its pre-publish state.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pdfpile::{
    AddOptions, DocumentProducer, Error, LocalStorage, PdfPile, PileConfig, PublishMode, Storage,
};
use tempfile::TempDir;

use crate::common::{destination_marks, marked_document};

/// Local storage with deterministic write/rename failure injection.
#[derive(Debug, Default)]
struct FlakyStorage {
    inner: LocalStorage,
    fail_writes: AtomicBool,
    fail_renames: AtomicBool,
}

impl FlakyStorage {
    fn new() -> Self {
        Self::default()
    }

    fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn fail_renames(&self, fail: bool) {
        self.fail_renames.store(fail, Ordering::SeqCst);
    }
}

impl Storage for FlakyStorage {
    fn exists(&self, location: &Path) -> io::Result<bool> {
        self.inner.exists(location)
    }

    fn read(&self, location: &Path) -> io::Result<Vec<u8>> {
        self.inner.read(location)
    }

    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("injected write failure"));
        }
        self.inner.write(location, bytes)
    }

    fn delete(&self, location: &Path) -> io::Result<()> {
        self.inner.delete(location)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        if self.fail_renames.load(Ordering::SeqCst) {
            return Err(io::Error::other("injected rename failure"));
        }
        self.inner.rename(from, to)
    }
}

async fn pile_with_published_page(
    destination: &Path,
) -> (PdfPile, Arc<FlakyStorage>) {
    let flaky = Arc::new(FlakyStorage::new());
    let mut pile = PdfPile::with_storage(
        destination,
        Arc::clone(&flaky) as Arc<dyn Storage>,
        PileConfig::default(),
    )
    .unwrap();

    pile.add_page(
        &mut DocumentProducer::new(marked_document(&[1])),
        AddOptions::deferred(),
    )
    .await
    .unwrap();
    pile.publish(PublishMode::Reset).await.unwrap();

    (pile, flaky)
}

#[tokio::test]
async fn failed_stage_write_leaves_destination_byte_identical() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");
    let (mut pile, flaky) = pile_with_published_page(&destination).await;
    let before = std::fs::read(&destination).unwrap();

    pile.add_page(
        &mut DocumentProducer::new(marked_document(&[2])),
        AddOptions::deferred(),
    )
    .await
    .unwrap();

    flaky.fail_writes(true);
    let err = pile.publish(PublishMode::Append).await.unwrap_err();
    assert!(matches!(err, Error::StageWrite { .. }));

    assert_eq!(std::fs::read(&destination).unwrap(), before);
    assert_eq!(destination_marks(&destination), vec![1]);
}

#[tokio::test]
async fn failed_rename_leaves_destination_byte_identical() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");
    let (mut pile, flaky) = pile_with_published_page(&destination).await;
    let before = std::fs::read(&destination).unwrap();

    flaky.fail_renames(true);
    let err = pile.publish(PublishMode::Append).await.unwrap_err();
    assert!(matches!(err, Error::Publish { .. }));

    assert_eq!(std::fs::read(&destination).unwrap(), before);
    // The stage carries its own suffix, so it never masquerades as the
    // destination.
    assert!(dir.path().join("out.pdf.tmp").exists());
}

#[tokio::test]
async fn caller_retry_succeeds_after_failure_clears() {
    let dir = TempDir::new().unwrap();
    let destination = dir.path().join("out.pdf");
    let (mut pile, flaky) = pile_with_published_page(&destination).await;

    flaky.fail_writes(true);
    pile.publish(PublishMode::Append).await.unwrap_err();

    flaky.fail_writes(false);
    pile.publish(PublishMode::Append).await.unwrap();
    assert_eq!(destination_marks(&destination), vec![1, 1]);
}
