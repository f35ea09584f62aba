//! Read-only queries over the catalog and content blobs
//!
//! Listing, substring search, and context lookup are linear scans over
//! the catalog. That is fine at personal-notes scale (hundreds of
//! records); an inverted index could replace the scan without changing
//! the external contract.

use eyre::Result;
use regex::RegexBuilder;
use tracing::debug;

use super::content::ContentStore;
use super::index::IndexStore;
use crate::note::{Note, NoteMeta};

/// Filters for listing notes; all supplied filters must match
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Only notes carrying this tag
    pub tag: Option<String>,

    /// Only notes whose context contains this key
    pub context_key: Option<String>,

    /// Only notes whose context maps the key to this value
    pub context_value: Option<String>,
}

impl ListFilter {
    /// Filter by tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Filter by context key, and optionally by its value
    pub fn with_context(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.context_key = Some(key.into());
        self.context_value = value;
        self
    }

    fn matches(&self, meta: &NoteMeta) -> bool {
        if let Some(tag) = &self.tag {
            if !meta.has_tag(tag) {
                return false;
            }
        }
        if let Some(key) = &self.context_key {
            match meta.context.get(key) {
                None => return false,
                Some(value) => {
                    if let Some(expected) = &self.context_value {
                        if value != expected {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}

/// Read-only view over IndexStore + ContentStore
pub struct QueryEngine<'a> {
    index: &'a IndexStore,
    content: &'a ContentStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a query view over the two lower stores
    pub fn new(index: &'a IndexStore, content: &'a ContentStore) -> Self {
        Self { index, content }
    }

    /// List catalog entries matching the filter, most recently updated first
    pub fn list(&self, filter: &ListFilter) -> Vec<NoteMeta> {
        let mut notes: Vec<NoteMeta> = self.index.iter().filter(|meta| filter.matches(meta)).cloned().collect();
        notes.sort_by(|a, b| b.updated.cmp(&a.updated));
        notes
    }

    /// Case-insensitive substring search over titles and content
    ///
    /// Content is read lazily, one candidate at a time. Catalog entries
    /// whose blob is missing are skipped. Results keep catalog order and
    /// are not relevance-ranked.
    pub fn search(&self, query: &str) -> Result<Vec<Note>> {
        let pattern = RegexBuilder::new(&regex::escape(query)).case_insensitive(true).build()?;

        let mut results = Vec::new();
        for meta in self.index.iter() {
            let content = match self.content.read(&meta.id)? {
                Some(content) => content,
                None => continue,
            };
            if pattern.is_match(&meta.title) || pattern.is_match(&content) {
                results.push(Note::new(meta.clone(), content));
            }
        }

        debug!(query, count = results.len(), "Search complete");
        Ok(results)
    }

    /// Every note whose context maps key to exactly value
    pub fn get_by_context(&self, key: &str, value: &str) -> Result<Vec<Note>> {
        let mut results = Vec::new();
        for meta in self.index.iter() {
            if meta.context.get(key).map(String::as_str) != Some(value) {
                continue;
            }
            if let Some(content) = self.content.read(&meta.id)? {
                results.push(Note::new(meta.clone(), content));
            }
        }
        Ok(results)
    }

    /// Full record for one id; None if the entry or its blob is missing
    pub fn get(&self, id: &str) -> Result<Option<Note>> {
        let meta = match self.index.get(id) {
            Some(meta) => meta.clone(),
            None => return Ok(None),
        };
        match self.content.read(id)? {
            Some(content) => Ok(Some(Note::new(meta, content))),
            None => Ok(None),
        }
    }

    /// Sorted unique tags across the catalog
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.index.iter().flat_map(|m| m.tags.iter().cloned()).collect();
        tags.sort();
        tags.dedup();
        tags
    }
}
