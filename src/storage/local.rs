//! Local-filesystem storage backend.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::Storage;

/// Storage backed by the local filesystem via `std::fs`.
///
/// `rename` maps to [`std::fs::rename`], which is atomic on POSIX
/// filesystems when source and target share a filesystem. Keep the
/// destination and its stage sibling on one mount; a cross-device rename
/// fails rather than degrading to copy-and-delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// Create a new local storage backend.
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn exists(&self, location: &Path) -> io::Result<bool> {
        location.try_exists()
    }

    fn read(&self, location: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(location)
    }

    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()> {
        let file = File::create(location)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(bytes)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    }

    fn delete(&self, location: &Path) -> io::Result<()> {
        match std::fs::remove_file(location) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            result => result,
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }
}
