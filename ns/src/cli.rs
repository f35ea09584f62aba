//! CLI argument parsing for notestore

use clap::{Parser, Subcommand};
use eyre::Result;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ns")]
#[command(author, version, about = "Persistent note store for LLM-assisted coding sessions", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new note
    Add {
        /// Note title
        #[arg(required = true)]
        title: String,

        /// Note content
        #[arg(required = true)]
        content: String,

        /// Tags to attach (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Context annotations as KEY=VALUE (repeatable)
        #[arg(short = 'x', long = "context")]
        context: Vec<String>,
    },

    /// Update fields of an existing note
    Update {
        /// Note id
        #[arg(required = true)]
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// Replacement tags (repeatable)
        #[arg(short, long = "tag")]
        tags: Option<Vec<String>>,

        /// Context annotations to merge in, as KEY=VALUE (repeatable)
        #[arg(short = 'x', long = "context")]
        context: Option<Vec<String>>,
    },

    /// Delete a note
    Delete {
        /// Note id
        #[arg(required = true)]
        id: String,
    },

    /// Show a single note with its content
    Get {
        /// Note id
        #[arg(required = true)]
        id: String,
    },

    /// List notes, most recently updated first
    List {
        /// Only notes carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Only notes whose context contains this key
        #[arg(long)]
        context_key: Option<String>,

        /// Only notes whose context maps the key to this value
        #[arg(long, requires = "context_key")]
        context_value: Option<String>,
    },

    /// Search note titles and content for a substring
    Search {
        /// Search query (matched case-insensitively)
        #[arg(required = true)]
        query: String,
    },

    /// Show notes attached to a context key/value pair
    Context {
        /// Context key (e.g. file_path)
        #[arg(required = true)]
        key: String,

        /// Context value (exact match)
        #[arg(required = true)]
        value: String,
    },

    /// List all tags in use
    Tags,

    /// Export all notes to a JSON document
    Export {
        /// Destination file
        #[arg(required = true)]
        destination: PathBuf,
    },

    /// Import notes from a JSON document, merging by id
    Import {
        /// Source file
        #[arg(required = true)]
        source: PathBuf,
    },
}

/// Parse repeated KEY=VALUE pairs into a context map
pub fn parse_context(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut context = HashMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) => {
                context.insert(key.to_string(), value.to_string());
            }
            None => return Err(eyre::eyre!("Invalid context pair (expected KEY=VALUE): {}", pair)),
        }
    }
    Ok(context)
}
