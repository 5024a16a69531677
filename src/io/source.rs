//! Reading pages out of stored documents.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use lopdf::Document;
use tokio::task;

use crate::error::{Error, Result};
use crate::storage::Storage;

/// A document read from storage, with its pages ready to merge.
///
/// Owning this value is what keeps the parsed document alive; it is the
/// "open resource" of the read. Drop it once its pages have been copied
/// into a merge output — ownership guarantees the release happens on
/// every exit path, including failures.
#[derive(Debug)]
pub struct LoadedPages {
    /// The parsed document.
    pub document: Document,
    /// Where the document was read from.
    pub location: PathBuf,
    /// Number of pages reachable from the document's page tree.
    pub page_count: usize,
}

/// Read the document at `location`, if there is one.
///
/// A missing location is an empty, non-error result: accumulating into a
/// destination that does not exist yet is the normal first-run case. A
/// zero-length document reads as absent too (a freshly allocated scratch
/// file holds no pages). A document that exists but does not parse is
/// [`Error::CorruptDocument`]; callers must not publish past it.
pub async fn read_pages(
    storage: Arc<dyn Storage>,
    location: impl Into<PathBuf>,
) -> Result<Option<LoadedPages>> {
    let location = location.into();
    task::spawn_blocking(move || read_pages_blocking(storage.as_ref(), &location))
        .await
        .map_err(Error::blocking_task)?
}

pub(crate) fn read_pages_blocking(
    storage: &dyn Storage,
    location: &Path,
) -> Result<Option<LoadedPages>> {
    if !storage.exists(location)? {
        debug!("no document at {}", location.display());
        return Ok(None);
    }

    let bytes = match storage.read(location) {
        Ok(bytes) => bytes,
        // Deleted between the existence check and the read.
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    if bytes.is_empty() {
        debug!("document at {} is empty", location.display());
        return Ok(None);
    }

    let document = Document::load_mem(&bytes)
        .map_err(|err| Error::corrupt(location, err.to_string()))?;
    let page_count = document.get_pages().len();
    debug!("read {page_count} page(s) from {}", location.display());

    Ok(Some(LoadedPages {
        document,
        location: location.to_path_buf(),
        page_count,
    }))
}
