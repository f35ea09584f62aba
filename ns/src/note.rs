//! Note data model
//!
//! A note is one stored record: metadata that lives in the catalog, plus a
//! content blob persisted separately and addressed only by id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Get current Unix timestamp in seconds
pub(crate) fn now_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Generate a fresh note id
///
/// UUIDv7 ids are time-ordered and stay unique under rapid successive
/// calls, unlike millisecond-timestamp ids.
pub(crate) fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

/// Catalog entry for a single note (everything except the content blob)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMeta {
    /// Unique identifier, assigned at creation, never reused
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Creation timestamp (Unix seconds)
    pub created: i64,

    /// Last update timestamp (Unix seconds), never earlier than `created`
    pub updated: i64,

    /// Free-form tags, stored verbatim
    #[serde(default)]
    pub tags: Vec<String>,

    /// Key/value annotations used for structural lookup (e.g. file_path)
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl NoteMeta {
    /// Create metadata for a new note with a generated id
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_timestamp();
        Self {
            id: generate_id(),
            title: title.into(),
            created: now,
            updated: now,
            tags: Vec::new(),
            context: HashMap::new(),
        }
    }

    /// Create metadata with a specific id (for import and tests)
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = now_timestamp();
        Self {
            id: id.into(),
            title: title.into(),
            created: now,
            updated: now,
            tags: Vec::new(),
            context: HashMap::new(),
        }
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the context map
    pub fn with_context(mut self, context: HashMap<String, String>) -> Self {
        self.context = context;
        self
    }

    /// Refresh the updated timestamp
    pub fn touch(&mut self) {
        self.updated = now_timestamp();
    }

    /// Check whether the note carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// A full note record: catalog metadata plus content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Catalog metadata
    #[serde(flatten)]
    pub meta: NoteMeta,

    /// The content blob
    pub content: String,
}

impl Note {
    /// Assemble a full record from metadata and content
    pub fn new(meta: NoteMeta, content: impl Into<String>) -> Self {
        Self {
            meta,
            content: content.into(),
        }
    }

    /// The note id
    pub fn id(&self) -> &str {
        &self.meta.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_meta_new() {
        let meta = NoteMeta::new("Fix bug");
        assert!(!meta.id.is_empty());
        assert_eq!(meta.title, "Fix bug");
        assert_eq!(meta.created, meta.updated);
        assert!(meta.tags.is_empty());
        assert!(meta.context.is_empty());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: Vec<String> = (0..100).map(|_| generate_id()).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn test_note_meta_builders() {
        let mut context = HashMap::new();
        context.insert("file_path".to_string(), "/tmp/a.py".to_string());

        let meta = NoteMeta::new("Fix bug")
            .with_tags(vec!["fix".to_string(), "urgent".to_string()])
            .with_context(context);

        assert!(meta.has_tag("fix"));
        assert!(meta.has_tag("urgent"));
        assert!(!meta.has_tag("Fix"));
        assert_eq!(meta.context.get("file_path").map(String::as_str), Some("/tmp/a.py"));
    }

    #[test]
    fn test_touch_never_goes_backwards() {
        let mut meta = NoteMeta::new("Note");
        let created = meta.created;
        meta.touch();
        assert!(meta.updated >= created);
    }

    #[test]
    fn test_note_serde_flattens_meta() {
        let meta = NoteMeta::with_id("note-1", "Title").with_tags(vec!["a".to_string()]);
        let note = Note::new(meta, "body text");

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], "note-1");
        assert_eq!(json["title"], "Title");
        assert_eq!(json["content"], "body text");

        let back: Note = serde_json::from_value(json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_note_meta_serde_defaults() {
        // Older records without tags/context still parse
        let json = r#"{"id":"note-1","title":"T","created":10,"updated":20}"#;
        let meta: NoteMeta = serde_json::from_str(json).unwrap();
        assert!(meta.tags.is_empty());
        assert!(meta.context.is_empty());
    }
}
