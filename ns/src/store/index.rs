//! Note metadata catalog
//!
//! Single source of truth for note metadata, held in memory as an ordered
//! list and persisted as one JSONL document. Every mutation is flushed
//! immediately. The index file is replaced atomically (write to a temp
//! file, then rename) so a crash never leaves a half-written catalog.

use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::note::NoteMeta;

/// Catalog file name inside the store directory
pub const INDEX_FILE: &str = "index.jsonl";

/// The ordered collection of all note metadata
pub struct IndexStore {
    path: PathBuf,
    notes: Vec<NoteMeta>,
}

impl IndexStore {
    /// Load the catalog from the store directory
    ///
    /// An absent index file is the normal first-run state. Unreadable
    /// files and unparseable lines degrade to an empty or partial catalog
    /// with a warning; the store stays available.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(INDEX_FILE);

        let notes = match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .filter(|line| !line.trim().is_empty())
                .filter_map(|line| match serde_json::from_str(line) {
                    Ok(meta) => Some(meta),
                    Err(e) => {
                        warn!(error = %e, "Skipping unparseable index line");
                        None
                    }
                })
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Failed to read index, starting empty");
                Vec::new()
            }
        };

        debug!(count = notes.len(), "Loaded note index");
        Ok(Self { path, notes })
    }

    /// Write the entire catalog back to disk
    pub fn persist(&self) -> Result<()> {
        let mut content = String::new();
        for meta in &self.notes {
            content.push_str(&serde_json::to_string(meta)?);
            content.push('\n');
        }

        let tmp = self.path.with_extension("jsonl.tmp");
        fs::write(&tmp, content).context("Failed to write index")?;
        fs::rename(&tmp, &self.path).context("Failed to replace index")?;

        debug!(count = self.notes.len(), "Persisted note index");
        Ok(())
    }

    /// Append a new catalog entry and flush
    pub fn append(&mut self, meta: NoteMeta) -> Result<()> {
        self.notes.push(meta);
        self.persist()
    }

    /// Replace the entry with the same id and flush; false if absent
    pub fn replace(&mut self, id: &str, meta: NoteMeta) -> Result<bool> {
        match self.notes.iter().position(|n| n.id == id) {
            Some(pos) => {
                self.notes[pos] = meta;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the entry with the given id and flush; false if absent
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        match self.notes.iter().position(|n| n.id == id) {
            Some(pos) => {
                self.notes.remove(pos);
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&NoteMeta> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Check whether the catalog holds an entry for the id
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &NoteMeta> {
        self.notes.iter()
    }

    /// Number of catalog entries
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True when the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
