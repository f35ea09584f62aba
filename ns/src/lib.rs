//! NoteStore - persistent notes for LLM-assisted coding sessions
//!
//! Stores short knowledge artifacts captured while working with a
//! text-generation service: titles, tags, and context annotations live in
//! a single ordered catalog; content bodies are one opaque blob per note.
//! Notes can be listed with tag/context filters, searched by substring,
//! looked up by context (e.g. "notes about this file"), and moved between
//! machines with bulk export/import.
//!
//! # Architecture
//!
//! ```text
//! {store_dir}/
//! ├── index.jsonl      # note metadata catalog, one object per line
//! ├── {id}.txt         # content blob per note
//! └── ...
//! ```
//!
//! # Example
//!
//! ```ignore
//! use notestore::NoteStore;
//!
//! let mut store = NoteStore::open(".notes")?;
//! let id = store.add("Fix bug", "body text", vec!["fix".into()], Default::default())?;
//! let hits = store.search("body")?;
//! let note = store.get(&id)?;
//! ```

pub mod cli;
pub mod config;
pub mod note;
pub mod store;

pub use config::Config;
pub use note::{Note, NoteMeta};
pub use store::{ContentStore, IndexStore, ListFilter, NoteStore, QueryEngine, TransferDocument};
