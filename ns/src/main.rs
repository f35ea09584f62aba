use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use notestore::cli::{Cli, Command, parse_context};
use notestore::config::Config;
use notestore::{ListFilter, NoteMeta, NoteStore};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn print_summary(meta: &NoteMeta) {
    let tags = if meta.tags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", meta.tags.join(", "))
    };
    println!(
        "{}  {}{}  {}",
        meta.id.yellow(),
        meta.title,
        tags.dimmed(),
        format_timestamp(meta.updated).dimmed()
    );
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("notestore starting");

    match cli.command {
        Command::Add {
            title,
            content,
            tags,
            context,
        } => {
            let context = parse_context(&context)?;
            let mut store = NoteStore::open(&config.store_path)?;
            let id = store.add(&title, &content, tags, context)?;
            println!("{} Added note: {}", "✓".green(), id.cyan());
        }
        Command::Update {
            id,
            title,
            content,
            tags,
            context,
        } => {
            let context = match context {
                Some(pairs) => Some(parse_context(&pairs)?),
                None => None,
            };
            let mut store = NoteStore::open(&config.store_path)?;
            if store.update(&id, title.as_deref(), content.as_deref(), tags, context)? {
                println!("{} Updated note: {}", "✓".green(), id.cyan());
            } else {
                println!("{} Note not found: {}", "✗".red(), id);
                std::process::exit(1);
            }
        }
        Command::Delete { id } => {
            let mut store = NoteStore::open(&config.store_path)?;
            if store.delete(&id)? {
                println!("{} Deleted note: {}", "✓".green(), id);
            } else {
                println!("{} Note not found: {}", "✗".red(), id);
                std::process::exit(1);
            }
        }
        Command::Get { id } => {
            let store = NoteStore::open(&config.store_path)?;
            match store.get(&id)? {
                Some(note) => {
                    println!("{} {}", note.meta.title.bold(), format!("({})", note.meta.id).dimmed());
                    println!(
                        "Created: {}  Updated: {}",
                        format_timestamp(note.meta.created),
                        format_timestamp(note.meta.updated)
                    );
                    if !note.meta.tags.is_empty() {
                        println!("Tags: {}", note.meta.tags.join(", "));
                    }
                    if !note.meta.context.is_empty() {
                        let mut pairs: Vec<String> =
                            note.meta.context.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                        pairs.sort();
                        println!("Context: {}", pairs.join(", "));
                    }
                    println!();
                    println!("{}", note.content);
                }
                None => {
                    println!("{} Note not found: {}", "✗".red(), id);
                    std::process::exit(1);
                }
            }
        }
        Command::List {
            tag,
            context_key,
            context_value,
        } => {
            let store = NoteStore::open(&config.store_path)?;
            let filter = ListFilter {
                tag,
                context_key,
                context_value,
            };
            let notes = store.list(&filter);
            if notes.is_empty() {
                println!("No notes found");
            } else {
                for meta in &notes {
                    print_summary(meta);
                }
            }
        }
        Command::Search { query } => {
            let store = NoteStore::open(&config.store_path)?;
            let notes = store.search(&query)?;
            if notes.is_empty() {
                println!("No notes found");
            } else {
                for note in &notes {
                    print_summary(&note.meta);
                }
            }
        }
        Command::Context { key, value } => {
            let store = NoteStore::open(&config.store_path)?;
            let notes = store.get_by_context(&key, &value)?;
            if notes.is_empty() {
                println!("No notes found");
            } else {
                for note in &notes {
                    print_summary(&note.meta);
                }
            }
        }
        Command::Tags => {
            let store = NoteStore::open(&config.store_path)?;
            for tag in store.tags() {
                println!("{}", tag);
            }
        }
        Command::Export { destination } => {
            let store = NoteStore::open(&config.store_path)?;
            let count = store.export_to(&destination)?;
            println!("{} Exported {} notes to {}", "✓".green(), count, destination.display());
        }
        Command::Import { source } => {
            let mut store = NoteStore::open(&config.store_path)?;
            let count = store.import_from(&source)?;
            println!("{} Imported {} notes", "✓".green(), count);
        }
    }

    Ok(())
}
