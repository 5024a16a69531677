//! Atomic document publishing.
//!
//! A publish never writes the destination in place. The document is
//! serialized in full to a stage sibling (destination name plus a `.tmp`
//! suffix, same backend), then moved onto the destination with the
//! backend's atomic rename. At every observable instant the destination
//! holds either the pre-publish document or the complete new one.

use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use lopdf::Document;
use tokio::task;

use crate::error::{Error, Result};
use crate::storage::Storage;

/// Statistics about a completed publish.
#[derive(Debug, Clone)]
pub struct PublishStats {
    /// Pages in the published document.
    pub total_pages: usize,

    /// Serialized size in bytes.
    pub bytes_written: u64,

    /// Time spent serializing, staging, and renaming.
    pub write_time: Duration,

    /// Where the document was published.
    pub destination: PathBuf,
}

impl PublishStats {
    /// Serialized size as a human-readable string.
    pub fn format_size(&self) -> String {
        format_file_size(self.bytes_written)
    }
}

/// Writes documents to a destination via stage-and-rename.
#[derive(Debug, Clone)]
pub struct Publisher {
    storage: Arc<dyn Storage>,
    compress: bool,
}

impl Publisher {
    /// Create a publisher that compresses documents before writing.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            compress: true,
        }
    }

    /// Create a publisher that writes documents uncompressed.
    pub fn without_compression(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            compress: false,
        }
    }

    /// Publish `document` onto `destination`.
    ///
    /// # Errors
    ///
    /// - [`Error::StageWrite`] if serializing or writing the stage fails.
    ///   The stage is left in place for inspection and the destination is
    ///   untouched.
    /// - [`Error::Publish`] if the rename fails (for local storage, e.g.
    ///   a cross-device move). The publish did not happen; the caller
    ///   must treat the destination as unchanged.
    pub async fn publish(&self, document: Document, destination: &Path) -> Result<PublishStats> {
        let publisher = self.clone();
        let destination = destination.to_path_buf();
        task::spawn_blocking(move || publisher.publish_blocking(document, &destination))
            .await
            .map_err(Error::blocking_task)?
    }

    pub(crate) fn publish_blocking(
        &self,
        mut document: Document,
        destination: &Path,
    ) -> Result<PublishStats> {
        let start = Instant::now();
        let total_pages = document.get_pages().len();
        let stage = stage_location(destination);

        if self.compress {
            document.compress();
        }
        document.renumber_objects();

        let mut buffer = Vec::new();
        document
            .save_to(&mut buffer)
            .map_err(|err| Error::StageWrite {
                path: stage.clone(),
                source: io::Error::other(err),
            })?;

        debug!(
            "staging {total_pages} page(s), {} byte(s) at {}",
            buffer.len(),
            stage.display()
        );
        self.storage
            .write(&stage, &buffer)
            .map_err(|source| Error::StageWrite {
                path: stage.clone(),
                source,
            })?;

        self.storage
            .rename(&stage, destination)
            .map_err(|source| Error::Publish {
                path: destination.to_path_buf(),
                source,
            })?;

        Ok(PublishStats {
            total_pages,
            bytes_written: buffer.len() as u64,
            write_time: start.elapsed(),
            destination: destination.to_path_buf(),
        })
    }
}

/// Stage sibling for a destination: same parent, name plus `.tmp`.
fn stage_location(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    destination.with_file_name(name)
}

fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
