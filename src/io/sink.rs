//! The scratch document sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use lopdf::Document;
use tokio::task;

use crate::error::{Error, Result};
use crate::io::publisher::Publisher;
use crate::io::source;
use crate::merge;
use crate::storage::Storage;

/// Append-only sink accumulating rendered pages in a scratch document.
///
/// Every append is persisted before the call returns, and persisted
/// atomically (the scratch is rewritten through the same stage-and-rename
/// path the destination uses), so a crash after N successful appends
/// leaves a scratch holding exactly the pages of those N calls.
#[derive(Debug)]
pub struct PageSink {
    storage: Arc<dyn Storage>,
    location: PathBuf,
    writer: Publisher,
    pending: usize,
}

impl PageSink {
    /// Create a sink writing to the scratch document at `location`.
    pub fn new(storage: Arc<dyn Storage>, location: PathBuf) -> Self {
        // Scratch writes skip compression: the scratch is rewritten on
        // every append and read back immediately on publish.
        let writer = Publisher::without_compression(Arc::clone(&storage));
        Self {
            storage,
            location,
            writer,
            pending: 0,
        }
    }

    /// Location of the scratch document.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Pages currently held by the scratch document.
    pub fn pending_pages(&self) -> usize {
        self.pending
    }

    /// Append the pages of `rendered` after the scratch's current last
    /// page. Returns the number of pages appended.
    ///
    /// Rendered content without a document catalog is rejected with
    /// [`Error::Render`] before the scratch is touched. A valid document
    /// with zero pages appends nothing and succeeds.
    pub async fn append(&mut self, rendered: Document) -> Result<usize> {
        if rendered.catalog().is_err() {
            return Err(Error::render("rendered content has no document catalog"));
        }

        let incoming = merge::page_count(&rendered);
        if incoming == 0 {
            debug!("rendered content holds no pages, scratch unchanged");
            return Ok(0);
        }

        let storage = Arc::clone(&self.storage);
        let location = self.location.clone();
        let writer = self.writer.clone();
        let appended = task::spawn_blocking(move || {
            let merged = match source::read_pages_blocking(storage.as_ref(), &location)? {
                Some(current) => {
                    let mut base = current.document;
                    merge::append_pages(&mut base, rendered)?;
                    base
                }
                None => rendered,
            };
            writer.publish_blocking(merged, &location)?;
            Ok::<_, Error>(incoming)
        })
        .await
        .map_err(Error::blocking_task)??;

        self.pending += appended;
        debug!(
            "appended {appended} page(s) to scratch {} ({} pending)",
            self.location.display(),
            self.pending
        );
        Ok(appended)
    }

    /// Remove the scratch document; the next append starts fresh.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.delete(&self.location)?;
        self.pending = 0;
        debug!("cleared scratch {}", self.location.display());
        Ok(())
    }
}
