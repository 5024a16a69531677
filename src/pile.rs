//! The accumulating pile: add pages over a program's lifetime, publish a
//! merged destination on demand.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use lopdf::Document;
use tempfile::TempPath;

use crate::config::{AddOptions, PileConfig, PublishMode, ScratchPolicy};
use crate::error::{Error, Result};
use crate::io::publisher::{PublishStats, Publisher};
use crate::io::sink::PageSink;
use crate::io::source;
use crate::merge;
use crate::producer::{BytesProducer, DocumentProducer, PageProducer};
use crate::storage::{LocalStorage, Storage};

/// Accumulates rendered pages into a persistent destination document.
///
/// A pile owns a process-local scratch document for its whole lifetime.
/// Pages land in the scratch first (each append persisted immediately),
/// and a publish merges the destination's prior pages with the scratch
/// pages and atomically replaces the destination — the destination file
/// is never written in place, so readers observe either the old document
/// or the complete new one.
///
/// The first publish in a pile's lifetime resets the destination unless
/// [`set_reset_policy`](Self::set_reset_policy) opted out before any page
/// was added; later publishes append. The scratch is retained across
/// publishes by default (so re-publishing re-merges already-published
/// pages); see [`ScratchPolicy`] to clear it instead.
///
/// One pile is single-owner state: methods take `&mut self` and callers
/// needing to share one across threads must serialize access themselves.
/// Cross-process publishes to one destination race on the final rename,
/// last writer wins.
///
/// # Examples
///
/// ```no_run
/// use pdfpile::{AddOptions, PdfPile, PublishMode};
///
/// # async fn example(figure: lopdf::Document, table: lopdf::Document) -> pdfpile::Result<()> {
/// let mut pile = PdfPile::new("report.pdf")?;
///
/// // Published immediately; first publish resets any prior report.pdf.
/// pile.add_document(figure).await?;
///
/// // Batch: append now, publish once at the end.
/// pile.add_page(&mut pdfpile::DocumentProducer::new(table), AddOptions::deferred())
///     .await?;
/// pile.publish(PublishMode::Append).await?;
///
/// pile.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PdfPile {
    destination: PathBuf,
    storage: Arc<dyn Storage>,
    local: Arc<dyn Storage>,
    config: PileConfig,
    scratch: Option<TempPath>,
    sink: PageSink,
    publisher: Publisher,
    published_once: bool,
}

impl PdfPile {
    /// Create a pile publishing to `destination` on the local filesystem.
    ///
    /// The destination is not touched; only the scratch document is
    /// allocated (empty, in the system temp directory).
    pub fn new(destination: impl Into<PathBuf>) -> Result<Self> {
        Self::with_storage(
            destination,
            Arc::new(LocalStorage::new()),
            PileConfig::default(),
        )
    }

    /// Create a pile publishing to `destination` on the given backend.
    ///
    /// The scratch document is always a local temp file, regardless of
    /// the destination backend (only published output travels through
    /// `storage`).
    pub fn with_storage(
        destination: impl Into<PathBuf>,
        storage: Arc<dyn Storage>,
        config: PileConfig,
    ) -> Result<Self> {
        let destination = destination.into();

        let mut builder = tempfile::Builder::new();
        builder.prefix("pdfpile-").suffix(".pdf");
        let scratch = match &config.scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }?
        .into_temp_path();
        debug!("created scratch document {}", scratch.display());

        let local: Arc<dyn Storage> = Arc::new(LocalStorage::new());
        let sink = PageSink::new(Arc::clone(&local), scratch.to_path_buf());
        let publisher = if config.compress {
            Publisher::new(Arc::clone(&storage))
        } else {
            Publisher::without_compression(Arc::clone(&storage))
        };

        Ok(Self {
            destination,
            storage,
            local,
            config,
            scratch: Some(scratch),
            sink,
            publisher,
            published_once: false,
        })
    }

    /// The destination location this pile publishes to.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Location of the scratch document, while the pile is open.
    pub fn scratch_path(&self) -> Option<&Path> {
        self.scratch.as_deref()
    }

    /// Pages currently held by the scratch document.
    pub fn pending_pages(&self) -> usize {
        self.sink.pending_pages()
    }

    /// Whether this pile has published successfully at least once.
    pub fn has_published(&self) -> bool {
        self.published_once
    }

    /// Choose whether the first publish resets the destination.
    ///
    /// `reset = false` appends to a pre-existing destination from the
    /// start. Call before the first page is added; the flag only governs
    /// the first publish's default, so changing it later has no effect
    /// once the pile has published.
    pub fn set_reset_policy(&mut self, reset: bool) {
        self.config.reset_on_first_publish = reset;
    }

    /// Run `producer` and append its pages to the scratch document.
    ///
    /// With `options.publish_now` (the default) the destination is
    /// published right away, using [`PublishMode::Reset`] if
    /// `options.force_reset` is set or this is the pile's first publish
    /// under the default reset policy, and [`PublishMode::Append`]
    /// otherwise.
    ///
    /// # Errors
    ///
    /// - [`Error::Producer`] if the producer fails; nothing is mutated.
    /// - [`Error::Render`] if the produced content cannot be appended;
    ///   the scratch is unchanged.
    /// - Any publish error, when `options.publish_now` is set. The pages
    ///   are already in the scratch at that point; a later publish will
    ///   pick them up.
    pub async fn add_page<P>(&mut self, producer: &mut P, options: AddOptions) -> Result<()>
    where
        P: PageProducer + ?Sized,
    {
        let rendered = producer.produce().map_err(Error::producer)?;
        self.sink.append(rendered).await?;

        if options.publish_now {
            let mode = if options.force_reset
                || (!self.published_once && self.config.reset_on_first_publish)
            {
                PublishMode::Reset
            } else {
                PublishMode::Append
            };
            self.publish(mode).await?;
        }

        Ok(())
    }

    /// Append an already-rendered document and publish (default options).
    pub async fn add_document(&mut self, document: Document) -> Result<()> {
        self.add_page(&mut DocumentProducer::new(document), AddOptions::default())
            .await
    }

    /// Append rendered document bytes and publish (default options).
    pub async fn add_bytes(&mut self, bytes: impl Into<Vec<u8>>) -> Result<()> {
        self.add_page(&mut BytesProducer::new(bytes), AddOptions::default())
            .await
    }

    /// Merge and publish the destination now.
    ///
    /// Reads the destination's current pages (under
    /// [`PublishMode::Append`] only) and the scratch pages, concatenates
    /// them old-first, and atomically replaces the destination. With
    /// nothing to publish — empty scratch and (for `Append`) no prior
    /// destination, or `Reset` with an empty scratch — the destination is
    /// left untouched and `Ok(None)` is returned.
    ///
    /// The scratch is retained or cleared afterwards per
    /// [`ScratchPolicy`]. Retained scratch means calling this again
    /// without adding pages re-appends the same pages; that is the
    /// documented legacy behavior, not an accident.
    ///
    /// # Errors
    ///
    /// - [`Error::CorruptDocument`] if the destination or scratch exists
    ///   but cannot be parsed. The destination is untouched; the scratch
    ///   is discarded before the error propagates so a later attempt
    ///   cannot trip over it.
    /// - [`Error::StageWrite`] / [`Error::Publish`] from the atomic
    ///   replace; the destination holds its pre-publish content.
    pub async fn publish(&mut self, mode: PublishMode) -> Result<Option<PublishStats>> {
        let old = if mode == PublishMode::Append {
            debug!("fetching previous document {}", self.destination.display());
            let read = source::read_pages(Arc::clone(&self.storage), &self.destination).await;
            self.discard_scratch_on_error(read)?
        } else {
            None
        };

        debug!("fetching scratch document {}", self.sink.location().display());
        let read = source::read_pages(Arc::clone(&self.local), self.sink.location()).await;
        let new = self.discard_scratch_on_error(read)?;

        let merged = merge::merge_documents(
            old.map(|loaded| loaded.document),
            new.map(|loaded| loaded.document),
        )?;
        let Some(document) = merged else {
            debug!("nothing to publish, destination untouched");
            return Ok(None);
        };

        let stats = self.publisher.publish(document, &self.destination).await?;
        self.published_once = true;
        debug!(
            "published {} page(s) ({}) to {}",
            stats.total_pages,
            stats.format_size(),
            stats.destination.display()
        );

        if self.config.scratch_policy == ScratchPolicy::ClearAfterPublish {
            self.sink.clear()?;
        }

        Ok(Some(stats))
    }

    /// Delete the scratch document and consume the pile.
    ///
    /// Dropping a pile deletes the scratch too (best-effort, failures
    /// logged); `close` is for callers who want the deletion error.
    pub fn close(mut self) -> Result<()> {
        if let Some(scratch) = self.scratch.take() {
            debug!("deleting scratch document {}", scratch.display());
            if let Err(err) = scratch.close()
                && err.kind() != std::io::ErrorKind::NotFound
            {
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Discard the scratch after a failed read, then hand the error back.
    ///
    /// An unreadable document must not survive to confuse the next
    /// publish attempt; cleanup failures are logged, never raised over
    /// the original error.
    fn discard_scratch_on_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            warn!("discarding scratch document after read failure: {err}");
            if let Err(cleanup) = self.sink.clear() {
                warn!("failed to discard scratch document: {cleanup}");
            }
        }
        result
    }
}

impl Drop for PdfPile {
    fn drop(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            debug!("deleting scratch document {}", scratch.display());
            if let Err(err) = scratch.close()
                && err.kind() != std::io::ErrorKind::NotFound
            {
                warn!("failed to delete scratch document: {err}");
            }
        }
    }
}
