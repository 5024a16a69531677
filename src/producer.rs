//! Page producers: the collaborators that hand rendered pages to a pile.
//!
//! A producer owns its own configuration and, when asked, yields rendered
//! content as a `lopdf::Document` contributing zero or more pages. The
//! pile treats every producer uniformly; what "rendering" means — a
//! plotted figure, a typeset table, bytes from another tool — is the
//! producer's business. Producer failures use `anyhow` so adapters can
//! surface whatever error their renderer produces.

use anyhow::Context;
use lopdf::Document;

/// Source of rendered page content.
pub trait PageProducer {
    /// Produce rendered content: a document whose pages (possibly none)
    /// will be appended to the pile's scratch.
    ///
    /// # Errors
    ///
    /// Any error signals an unrecoverable rendering failure; the pile
    /// wraps it in [`Error::Producer`](crate::Error::Producer) and leaves
    /// all state unchanged. Producers are not retried.
    fn produce(&mut self) -> anyhow::Result<Document>;
}

impl<F> PageProducer for F
where
    F: FnMut() -> anyhow::Result<Document>,
{
    fn produce(&mut self) -> anyhow::Result<Document> {
        self()
    }
}

/// Producer wrapping an already-rendered document.
#[derive(Debug, Clone)]
pub struct DocumentProducer {
    document: Document,
}

impl DocumentProducer {
    /// Wrap a rendered document.
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl PageProducer for DocumentProducer {
    fn produce(&mut self) -> anyhow::Result<Document> {
        Ok(self.document.clone())
    }
}

/// Producer wrapping raw document bytes, parsed at produce time.
///
/// Useful when the renderer is an external tool that emits finished
/// bytes; parse failures surface as producer errors.
#[derive(Debug, Clone)]
pub struct BytesProducer {
    bytes: Vec<u8>,
}

impl BytesProducer {
    /// Wrap rendered document bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl PageProducer for BytesProducer {
    fn produce(&mut self) -> anyhow::Result<Document> {
        Document::load_mem(&self.bytes).context("rendered bytes do not parse as a document")
    }
}
