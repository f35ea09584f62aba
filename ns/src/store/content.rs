//! Note content blobs
//!
//! One text file per note id, stored next to the index. Blobs are opaque
//! to the store and addressed only by id.

use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-per-note storage for content bodies
pub struct ContentStore {
    dir: PathBuf,
}

impl ContentStore {
    /// Create a content store rooted at the given directory
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn blob_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", id))
    }

    /// Create or overwrite the blob for an id
    pub fn write(&self, id: &str, text: &str) -> Result<()> {
        fs::write(self.blob_path(id), text).context(format!("Failed to write content for note {}", id))
    }

    /// Read the blob, or None if absent
    pub fn read(&self, id: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.blob_path(id)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(format!("Failed to read content for note {}", id)),
        }
    }

    /// Remove the blob if present; removing an absent blob is a no-op
    pub fn delete(&self, id: &str) -> Result<bool> {
        let path = self.blob_path(id);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).context(format!("Failed to delete content for note {}", id))?;
        debug!(%id, "Deleted content blob");
        Ok(true)
    }

    /// Check whether a blob exists for the id
    pub fn exists(&self, id: &str) -> bool {
        self.blob_path(id).exists()
    }
}
