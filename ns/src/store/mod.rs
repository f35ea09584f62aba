//! Persistent note store
//!
//! Metadata lives in a single ordered catalog; content bodies are one
//! blob per note, addressed by id. Mutations write content before the
//! catalog entry that references it, and flush the catalog on every
//! change, so a crash can leave at worst an orphan content blob.
//!
//! ```text
//! {store_dir}/
//! ├── index.jsonl      # note metadata catalog, one object per line
//! ├── {id}.txt         # content blob per note
//! └── ...
//! ```

mod content;
mod index;
mod query;
mod transfer;

pub use content::ContentStore;
pub use index::{INDEX_FILE, IndexStore};
pub use query::{ListFilter, QueryEngine};
pub use transfer::TransferDocument;

use eyre::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::note::{Note, NoteMeta};

/// The main note store: catalog + content blobs under one directory
///
/// Store logic is synchronous and single-threaded; callers that share a
/// store across threads must serialize access themselves.
pub struct NoteStore {
    index: IndexStore,
    content: ContentStore,
}

impl NoteStore {
    /// Open or create a note store at the given directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).context("Failed to create store directory")?;
        let index = IndexStore::load(dir)?;
        let content = ContentStore::new(dir);
        debug!(dir = %dir.display(), notes = index.len(), "Opened note store");
        Ok(Self { index, content })
    }

    fn query(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.index, &self.content)
    }

    /// Add a new note, returning its generated id
    pub fn add(
        &mut self,
        title: &str,
        content: &str,
        tags: Vec<String>,
        context: HashMap<String, String>,
    ) -> Result<String> {
        let meta = NoteMeta::new(title).with_tags(tags).with_context(context);
        let id = meta.id.clone();

        // Content first, then the catalog entry referencing it
        self.content.write(&id, content)?;
        self.index.append(meta)?;

        info!(%id, "Added note");
        Ok(id)
    }

    /// Partially update an existing note; false if the id is unknown
    ///
    /// Unspecified fields are left unchanged. Tags replace the existing
    /// set; a context update merges into the existing map. The updated
    /// timestamp is refreshed either way.
    pub fn update(
        &mut self,
        id: &str,
        title: Option<&str>,
        content: Option<&str>,
        tags: Option<Vec<String>>,
        context: Option<HashMap<String, String>>,
    ) -> Result<bool> {
        let mut meta = match self.index.get(id) {
            Some(meta) => meta.clone(),
            None => return Ok(false),
        };

        if let Some(title) = title {
            meta.title = title.to_string();
        }
        if let Some(tags) = tags {
            meta.tags = tags;
        }
        if let Some(context) = context {
            meta.context.extend(context);
        }
        meta.touch();

        if let Some(content) = content {
            self.content.write(id, content)?;
        }
        self.index.replace(id, meta)?;

        info!(%id, "Updated note");
        Ok(true)
    }

    /// Delete a note; false if the id is unknown
    ///
    /// The catalog entry goes first, so a crash mid-delete leaves an
    /// orphan content blob rather than a dangling catalog entry.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        if !self.index.remove(id)? {
            return Ok(false);
        }
        self.content.delete(id)?;
        info!(%id, "Deleted note");
        Ok(true)
    }

    /// Full record for one id; None if the entry or its blob is missing
    pub fn get(&self, id: &str) -> Result<Option<Note>> {
        self.query().get(id)
    }

    /// Catalog entries matching the filter, most recently updated first
    pub fn list(&self, filter: &ListFilter) -> Vec<NoteMeta> {
        self.query().list(filter)
    }

    /// Case-insensitive substring search over titles and content
    pub fn search(&self, query: &str) -> Result<Vec<Note>> {
        self.query().search(query)
    }

    /// Every note whose context maps key to exactly value
    pub fn get_by_context(&self, key: &str, value: &str) -> Result<Vec<Note>> {
        self.query().get_by_context(key, value)
    }

    /// Sorted unique tags across all notes
    pub fn tags(&self) -> Vec<String> {
        self.query().tags()
    }

    /// Assemble every fully readable note into one document
    pub fn export(&self) -> Result<TransferDocument> {
        transfer::export(&self.index, &self.content)
    }

    /// Export to a JSON file, returning the number of notes written
    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<usize> {
        transfer::export_to(&self.index, &self.content, path.as_ref())
    }

    /// Merge records from a document, returning the number applied
    pub fn import(&mut self, doc: TransferDocument) -> Result<usize> {
        transfer::import(&mut self.index, &self.content, doc)
    }

    /// Import from a JSON file, returning the number of records applied
    pub fn import_from(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        transfer::import_from(&mut self.index, &self.content, path.as_ref())
    }

    /// Number of notes in the catalog
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when the store holds no notes
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
