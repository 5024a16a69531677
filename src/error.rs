//! Error types for pdfpile.
//!
//! Every failure the crate can surface is a variant of [`Error`]. The
//! guiding rule is that errors propagate to the caller unchanged; the only
//! local handling anywhere in the crate is best-effort scratch cleanup,
//! where failures are logged and swallowed. There is no automatic retry —
//! whether re-running an operation is safe is the caller's call.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfpile operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pdfpile operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A page producer failed to yield rendered content.
    ///
    /// The pile's scratch document and the destination are unchanged.
    /// Producers are external collaborators; their failures are never
    /// retried by the crate.
    #[error("page producer failed: {source}")]
    Producer {
        /// The producer's own error, verbatim.
        #[source]
        source: anyhow::Error,
    },

    /// Rendered content was rejected by the page sink.
    ///
    /// Raised before the scratch document is touched, so the caller may
    /// fix the content and try again.
    #[error("cannot append rendered content: {reason}")]
    Render {
        /// Why the content cannot be appended.
        reason: String,
    },

    /// A document exists at the given location but cannot be parsed.
    #[error("corrupt document at {path}: {details}")]
    CorruptDocument {
        /// Location of the unreadable document.
        path: PathBuf,
        /// Parser diagnostics.
        details: String,
    },

    /// A document's page tree cannot be traversed or extended.
    #[error("page tree operation failed: {reason}")]
    PageTree {
        /// What went wrong while walking or splicing the tree.
        reason: String,
    },

    /// Writing the staged output failed.
    ///
    /// The stage file is left in place for inspection; the destination is
    /// untouched.
    #[error("failed to write staged output {path}: {source}")]
    StageWrite {
        /// Location of the stage file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Moving the staged output onto the destination failed.
    ///
    /// The publish did not happen; the destination holds its pre-publish
    /// content.
    #[error("failed to move staged output onto {path}: {source}")]
    Publish {
        /// The destination that was not replaced.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Generic storage-level I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a `Producer` error from any producer-side failure.
    pub fn producer(source: impl Into<anyhow::Error>) -> Self {
        Self::Producer {
            source: source.into(),
        }
    }

    /// Create a `Render` error.
    pub fn render(reason: impl Into<String>) -> Self {
        Self::Render {
            reason: reason.into(),
        }
    }

    /// Create a `CorruptDocument` error.
    pub fn corrupt(path: impl Into<PathBuf>, details: impl Into<String>) -> Self {
        Self::CorruptDocument {
            path: path.into(),
            details: details.into(),
        }
    }

    /// Create a `PageTree` error.
    pub fn page_tree(reason: impl Into<String>) -> Self {
        Self::PageTree {
            reason: reason.into(),
        }
    }

    pub(crate) fn blocking_task(err: tokio::task::JoinError) -> Self {
        Self::Io(io::Error::other(format!("blocking task failed: {err}")))
    }
}
