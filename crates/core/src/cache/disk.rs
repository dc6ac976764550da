//! File-backed cache: one JSON file per key inside a dedicated directory.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CacheError, CacheKey, KeyValueStore};

/// Cache storing each entry as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    /// Open a cache rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for DiskCache {
    fn read(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CacheError::NotFound(key.to_string())),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        let target = self.path_for(key);
        atomic_write(&target, bytes)?;
        debug!(key = %key, bytes = bytes.len(), "Cache entry written");
        Ok(())
    }
}

/// Write `bytes` to a uniquely named sibling file, sync it, then rename it
/// over `target`. Rename within one directory is atomic on POSIX filesystems.
fn atomic_write(target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = target.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));

    let result = (|| {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        // Rename does not replace an existing file on Windows.
        #[cfg(windows)]
        if target.exists() {
            fs::remove_file(target)?;
        }

        fs::rename(&temp_path, target)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}
