//! Bulk export and merge-on-import
//!
//! Export assembles every fully readable note into one self-contained
//! JSON document. Import merges records back by id: existing notes are
//! overwritten, new ids are created. Importing the same document twice
//! leaves the store unchanged.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::content::ContentStore;
use super::index::IndexStore;
use crate::note::{Note, NoteMeta, now_timestamp};

/// Self-contained collection of full note records, suitable for copying
/// between machines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferDocument {
    /// Full records; kept as raw values so one malformed record never
    /// poisons the rest of the document
    pub notes: Vec<serde_json::Value>,
}

impl TransferDocument {
    /// Number of records in the document
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True when the document holds no records
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// One record as read from an import document
///
/// Records missing id, title, or content fail to parse and are skipped.
#[derive(Debug, Deserialize)]
struct ImportRecord {
    id: String,
    title: String,
    content: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    context: HashMap<String, String>,
    created: Option<i64>,
    updated: Option<i64>,
}

/// Assemble every note with a readable content blob into one document
///
/// Catalog entries whose blob is missing are skipped.
pub fn export(index: &IndexStore, content: &ContentStore) -> Result<TransferDocument> {
    let mut notes = Vec::new();
    for meta in index.iter() {
        let body = match content.read(&meta.id)? {
            Some(body) => body,
            None => {
                warn!(id = %meta.id, "Skipping note with missing content blob");
                continue;
            }
        };
        notes.push(serde_json::to_value(Note::new(meta.clone(), body))?);
    }
    debug!(count = notes.len(), "Assembled export document");
    Ok(TransferDocument { notes })
}

/// Export to a file as pretty-printed JSON, returning the record count
pub fn export_to(index: &IndexStore, content: &ContentStore, path: &Path) -> Result<usize> {
    let doc = export(index, content)?;
    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(path, json).context(format!("Failed to write export to {}", path.display()))?;
    Ok(doc.len())
}

/// Merge records from a document into the store
///
/// Malformed records (missing id, title, or content) are skipped and not
/// counted; the rest of the document is still applied. Returns the number
/// of records applied, whether created or updated.
pub fn import(index: &mut IndexStore, content: &ContentStore, doc: TransferDocument) -> Result<usize> {
    let mut count = 0;
    for value in doc.notes {
        let record: ImportRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Skipping malformed import record");
                continue;
            }
        };
        apply(index, content, record)?;
        count += 1;
    }
    debug!(count, "Import complete");
    Ok(count)
}

/// Import from a JSON document file
pub fn import_from(index: &mut IndexStore, content: &ContentStore, path: &Path) -> Result<usize> {
    let json = fs::read_to_string(path).context(format!("Failed to read import from {}", path.display()))?;
    let doc: TransferDocument = serde_json::from_str(&json).context("Failed to parse import document")?;
    import(index, content, doc)
}

fn apply(index: &mut IndexStore, content: &ContentStore, record: ImportRecord) -> Result<()> {
    let existing = index.get(&record.id).cloned();
    match existing {
        Some(mut meta) => {
            meta.title = record.title;
            meta.tags = record.tags;
            meta.context.extend(record.context);
            // Taking `updated` from the record keeps re-imports idempotent
            meta.updated = record.updated.unwrap_or_else(now_timestamp);
            content.write(&record.id, &record.content)?;
            index.replace(&record.id, meta)?;
        }
        None => {
            let now = now_timestamp();
            let meta = NoteMeta {
                id: record.id.clone(),
                title: record.title,
                created: record.created.unwrap_or(now),
                updated: record.updated.unwrap_or(now),
                tags: record.tags,
                context: record.context,
            };
            // Content lands before the catalog entry that references it
            content.write(&record.id, &record.content)?;
            index.append(meta)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::{TempDir, tempdir};

    fn fixture() -> (TempDir, IndexStore, ContentStore) {
        let temp = tempdir().unwrap();
        let index = IndexStore::load(temp.path()).unwrap();
        let content = ContentStore::new(temp.path());
        (temp, index, content)
    }

    fn seed(index: &mut IndexStore, content: &ContentStore, id: &str, title: &str, body: &str) {
        content.write(id, body).unwrap();
        index.append(NoteMeta::with_id(id, title)).unwrap();
    }

    #[test]
    fn test_export_includes_full_records() {
        let (_temp, mut index, content) = fixture();
        seed(&mut index, &content, "note-1", "First", "body one");

        let doc = export(&index, &content).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.notes[0]["id"], "note-1");
        assert_eq!(doc.notes[0]["title"], "First");
        assert_eq!(doc.notes[0]["content"], "body one");
    }

    #[test]
    fn test_export_skips_missing_blobs() {
        let (_temp, mut index, content) = fixture();
        seed(&mut index, &content, "note-1", "Whole", "body");
        index.append(NoteMeta::with_id("note-2", "Orphan entry")).unwrap();

        let doc = export(&index, &content).unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.notes[0]["id"], "note-1");
    }

    #[test]
    fn test_import_creates_with_imported_timestamps() {
        let (_temp, mut index, content) = fixture();

        let doc = TransferDocument {
            notes: vec![json!({
                "id": "note-1",
                "title": "Imported",
                "created": 1000,
                "updated": 2000,
                "tags": ["fix"],
                "context": {"project": "alpha"},
                "content": "imported body"
            })],
        };

        let count = import(&mut index, &content, doc).unwrap();
        assert_eq!(count, 1);

        let meta = index.get("note-1").unwrap();
        assert_eq!(meta.created, 1000);
        assert_eq!(meta.updated, 2000);
        assert_eq!(meta.tags, vec!["fix"]);
        assert_eq!(content.read("note-1").unwrap().as_deref(), Some("imported body"));
    }

    #[test]
    fn test_import_without_timestamps_uses_now() {
        let (_temp, mut index, content) = fixture();

        let doc = TransferDocument {
            notes: vec![json!({"id": "note-1", "title": "T", "content": "c"})],
        };
        import(&mut index, &content, doc).unwrap();

        let meta = index.get("note-1").unwrap();
        assert!(meta.created > 0);
        assert_eq!(meta.created, meta.updated);
    }

    #[test]
    fn test_import_overwrites_existing_and_merges_context() {
        let (_temp, mut index, content) = fixture();
        let mut ctx = HashMap::new();
        ctx.insert("project".to_string(), "alpha".to_string());
        content.write("note-1", "old body").unwrap();
        index
            .append(NoteMeta::with_id("note-1", "Old title").with_context(ctx))
            .unwrap();

        let doc = TransferDocument {
            notes: vec![json!({
                "id": "note-1",
                "title": "New title",
                "updated": 5000,
                "tags": ["new"],
                "context": {"file_path": "/a.py"},
                "content": "new body"
            })],
        };
        let count = import(&mut index, &content, doc).unwrap();
        assert_eq!(count, 1);

        let meta = index.get("note-1").unwrap();
        assert_eq!(meta.title, "New title");
        assert_eq!(meta.tags, vec!["new"]);
        // Imported context merges into the existing map
        assert_eq!(meta.context.get("project").map(String::as_str), Some("alpha"));
        assert_eq!(meta.context.get("file_path").map(String::as_str), Some("/a.py"));
        assert_eq!(meta.updated, 5000);
        assert_eq!(content.read("note-1").unwrap().as_deref(), Some("new body"));
    }

    #[test]
    fn test_import_skips_malformed_records() {
        let (_temp, mut index, content) = fixture();

        let doc = TransferDocument {
            notes: vec![
                json!({"id": "note-1", "title": "Good", "content": "body"}),
                json!({"title": "No id", "content": "body"}),
                json!({"id": "note-3", "content": "no title"}),
                json!({"id": "note-4", "title": "No content"}),
                json!("not even an object"),
            ],
        };

        let count = import(&mut index, &content, doc).unwrap();
        assert_eq!(count, 1);
        assert_eq!(index.len(), 1);
        assert!(index.contains("note-1"));
    }

    #[test]
    fn test_import_twice_is_idempotent() {
        let (_temp, mut index, content) = fixture();
        seed(&mut index, &content, "note-1", "First", "body one");
        seed(&mut index, &content, "note-2", "Second", "body two");

        let doc = export(&index, &content).unwrap();

        let first = import(&mut index, &content, doc.clone()).unwrap();
        let snapshot = export(&index, &content).unwrap();

        let second = import(&mut index, &content, doc).unwrap();
        let after = export(&index, &content).unwrap();

        assert_eq!(first, second);
        assert_eq!(index.len(), 2);
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            serde_json::to_value(&after).unwrap()
        );
    }

    #[test]
    fn test_export_import_round_trip_into_empty_store() {
        let (_temp, mut index, content) = fixture();
        let mut ctx = HashMap::new();
        ctx.insert("file_path".to_string(), "/tmp/a.py".to_string());
        content.write("note-1", "body one").unwrap();
        index
            .append(
                NoteMeta::with_id("note-1", "First")
                    .with_tags(vec!["fix".to_string()])
                    .with_context(ctx),
            )
            .unwrap();

        let doc = export(&index, &content).unwrap();

        let (_temp2, mut index2, content2) = fixture();
        let count = import(&mut index2, &content2, doc).unwrap();
        assert_eq!(count, 1);

        let original = index.get("note-1").unwrap();
        let restored = index2.get("note-1").unwrap();
        assert_eq!(original, restored);
        assert_eq!(content2.read("note-1").unwrap().as_deref(), Some("body one"));
    }

    #[test]
    fn test_export_to_and_import_from_files() {
        let (_temp, mut index, content) = fixture();
        seed(&mut index, &content, "note-1", "First", "body one");

        let file = _temp.path().join("backup.json");
        let exported = export_to(&index, &content, &file).unwrap();
        assert_eq!(exported, 1);

        let (_temp2, mut index2, content2) = fixture();
        let imported = import_from(&mut index2, &content2, &file).unwrap();
        assert_eq!(imported, 1);
        assert!(index2.contains("note-1"));
    }
}
