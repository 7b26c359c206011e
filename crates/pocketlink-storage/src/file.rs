use crate::kv::KeyValueStore;
use pocketlink_core::error::{Result, StorageError};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, trace};

/// A key-value store keeping one file per key under a data directory.
///
/// Values are written to a uniquely named temporary file in the same
/// directory and renamed into place, so a reader sees either the old value
/// or the new one, never a torn write. A failed write removes its temporary
/// file. Concurrent writers (threads or processes) each use their own
/// temporary file; the last rename wins.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StorageError::Unavailable(format!("cannot create '{}': {e}", dir.display()))
        })?;
        debug!(component = "storage", dir = %dir.display(), "opened file store");
        Ok(Self { dir })
    }

    /// Returns the directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || !key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(StorageError::InvalidData(format!("invalid key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        trace!(component = "storage", path = %path.display(), "reading key");

        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::with_prefix_in(format!(".{key}."), &self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StorageError::from(e.error))?;

        trace!(component = "storage", path = %path.display(), bytes = value.len(), "wrote key");
        Ok(())
    }
}
