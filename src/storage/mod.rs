//! Storage backends for document locations.
//!
//! A destination is addressed by a location key (a [`Path`]) interpreted
//! by a [`Storage`] backend. Every backend implements the same five
//! operations, so the rest of the crate never probes what kind of
//! location it holds — local files and virtual backends go through the
//! identical code path.

pub mod local;
pub mod memory;

pub use local::LocalStorage;
pub use memory::MemoryStorage;

use std::fmt;
use std::io;
use std::path::Path;

/// A document storage backend.
///
/// Implementations interpret locations as keys in their own namespace; a
/// location is only meaningful to the backend that issued it. Methods are
/// blocking — callers that need async offload them (the crate does so via
/// `tokio::task::spawn_blocking`).
pub trait Storage: Send + Sync + fmt::Debug {
    /// Whether a document exists at `location`.
    fn exists(&self, location: &Path) -> io::Result<bool>;

    /// Read the full document at `location`.
    fn read(&self, location: &Path) -> io::Result<Vec<u8>>;

    /// Write `bytes` to `location`, replacing prior content.
    ///
    /// The write must be durable when this returns: a crash immediately
    /// after must not lose or truncate the content.
    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Remove the document at `location`. Removing a missing document is
    /// not an error.
    fn delete(&self, location: &Path) -> io::Result<()>;

    /// Move the document at `from` onto `to` in one storage-visible step,
    /// replacing any prior content at `to`.
    ///
    /// This is the primitive the atomic-publish guarantee rests on.
    /// Backends that cannot offer a truly atomic replace (some remote
    /// stores only approximate it) weaken the guarantee to best effort
    /// and must say so in their own documentation.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}
