//! pdfpile - Accumulate rendered pages into a persistent PDF document.
//!
//! A [`PdfPile`] collects pages produced at different points of a
//! program's execution — rendered figures, typeset tables, anything that
//! yields pages — and keeps a destination document up to date without
//! ever leaving it half-written:
//!
//! - Pages land in a process-local **scratch** document first; every
//!   append is persisted before the call returns.
//! - A **publish** merges the destination's prior pages with the scratch
//!   pages (old first, order preserved) and replaces the destination via
//!   stage-file-plus-atomic-rename. Readers observe either the old
//!   document or the complete new one, never a partial write.
//! - The first publish resets the destination by default; later
//!   publishes append. Both are overridable.
//!
//! Destinations go through a pluggable [`Storage`] backend, so local
//! files and virtual/remote locations follow the identical code path.
//!
//! # Examples
//!
//! ```no_run
//! use pdfpile::{AddOptions, PdfPile, PublishMode};
//!
//! # fn render_chapter() -> anyhow::Result<lopdf::Document> { unimplemented!() }
//! # async fn example(figure: lopdf::Document) -> pdfpile::Result<()> {
//! let mut pile = PdfPile::new("report.pdf")?;
//!
//! // Render-and-publish in one step.
//! pile.add_document(figure).await?;
//!
//! // Or batch several producers and publish once.
//! let mut chapter = render_chapter;
//! pile.add_page(&mut chapter, AddOptions::deferred()).await?;
//! pile.publish(PublishMode::Append).await?;
//!
//! pile.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! One pile is not safe for unsynchronized sharing across threads, and
//! two processes publishing to one destination race on the final rename
//! (last writer wins). Within one pile, a publish observes every add
//! awaited before it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod pile;
pub mod producer;
pub mod storage;


pub use config::{AddOptions, PileConfig, PublishMode, ScratchPolicy};
pub use error::{Error, Result};
pub use io::{LoadedPages, PageSink, PublishStats, Publisher};
pub use pile::PdfPile;
pub use producer::{BytesProducer, DocumentProducer, PageProducer};
pub use storage::{LocalStorage, MemoryStorage, Storage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
