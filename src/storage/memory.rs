//! In-memory storage backend.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::Storage;

/// Storage keeping documents in a process-local map.
///
/// Locations are opaque keys with no filesystem meaning, which makes this
/// backend a stand-in for remote or virtual destinations. `rename` holds
/// the map lock across remove-and-insert, so the replace is atomic to
/// every other accessor of the same backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> io::Result<std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<u8>>>> {
        self.files
            .lock()
            .map_err(|_| io::Error::other("memory storage lock poisoned"))
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, location: &Path) -> io::Result<bool> {
        Ok(self.locked()?.contains_key(location))
    }

    fn read(&self, location: &Path) -> io::Result<Vec<u8>> {
        self.locked()?.get(location).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no document at {}", location.display()),
            )
        })
    }

    fn write(&self, location: &Path, bytes: &[u8]) -> io::Result<()> {
        self.locked()?.insert(location.to_path_buf(), bytes.to_vec());
        Ok(())
    }

    fn delete(&self, location: &Path) -> io::Result<()> {
        self.locked()?.remove(location);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut files = self.locked()?;
        let bytes = files.remove(from).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no document at {}", from.display()),
            )
        })?;
        files.insert(to.to_path_buf(), bytes);
        Ok(())
    }
}
