//! Terminal front end for the bookshelf.
//!
//! # Responsibility
//! - Map each shelf button/form to one subcommand.
//! - Print the re-rendered shelf after every command.

mod prompt;

use anyhow::{Context, Result};
use bookshelf_core::db::{open_db, SqliteKeyValueStore};
use bookshelf_core::{
    init_logging, render_text, Book, BookEdit, BookId, Bookshelf, BookshelfConfig,
    KvBookRepository, NewBook, ShelfView,
};
use clap::{Parser, Subcommand};
use log::info;
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(
    name = "bookshelf",
    version,
    about = "Manage a personal bookshelf",
    long_about = None
)]
struct Cli {
    /// Shelf database file (defaults to BOOKSHELF_DB_PATH or a temp file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files; logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a book to the shelf
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long, allow_negative_numbers = true)]
        year: i32,
        /// Shelve it as already finished.
        #[arg(long)]
        complete: bool,
    },
    /// Show both lists
    List,
    /// Show books whose title contains KEYWORD (case-insensitive)
    Search {
        #[arg(default_value = "")]
        keyword: String,
    },
    /// Move a book to the finished list
    Complete { id: BookId },
    /// Move a book back to the not-finished list
    Undo { id: BookId },
    /// Edit a book; prompts for every field when no flag is given
    Edit {
        id: BookId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        year: Option<String>,
    },
    /// Remove a book from the shelf
    Delete { id: BookId },
}

/// JSON envelope printed with `--json`.
#[derive(Debug, Serialize)]
struct CommandOutput {
    changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    book: Option<Book>,
    view: ShelfView,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        init_logging(config.log_level, &log_dir.to_string_lossy())
            .context("failed to initialize logging")?;
    }

    let conn = open_db(&config.db_path).with_context(|| {
        format!("failed to open shelf database `{}`", config.db_path.display())
    })?;
    let mut shelf = Bookshelf::load(KvBookRepository::new(SqliteKeyValueStore::new(&conn)))
        .context("failed to load shelf")?;

    let latest = Rc::new(RefCell::new(None::<ShelfView>));
    let sink = Rc::clone(&latest);
    shelf.subscribe(move |view| *sink.borrow_mut() = Some(view.clone()));

    let (changed, book, note) = run(&mut shelf, cli.command)?;
    info!("event=cli_command module=cli status=ok changed={changed}");

    let view = latest.borrow_mut().take().unwrap_or_else(|| shelf.view());
    if cli.json {
        let output = CommandOutput {
            changed,
            book,
            view,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if let Some(note) = note {
            println!("{note}\n");
        }
        print!("{}", render_text(&view));
    }
    Ok(())
}

type CommandResult = (bool, Option<Book>, Option<String>);

fn run<R: bookshelf_core::BookRepository>(
    shelf: &mut Bookshelf<R>,
    command: Commands,
) -> Result<CommandResult> {
    let outcome = match command {
        Commands::Add {
            title,
            author,
            year,
            complete,
        } => {
            let book = shelf.add(NewBook::new(title, author, year, complete))?;
            let note = format!("Added book {}.", book.id);
            (true, Some(book), Some(note))
        }
        Commands::List => {
            shelf.render();
            (false, None, None)
        }
        Commands::Search { keyword } => {
            shelf.search(&keyword);
            (false, None, None)
        }
        Commands::Complete { id } => flag_outcome(shelf.mark_complete(id)?, id, "finished"),
        Commands::Undo { id } => flag_outcome(shelf.mark_incomplete(id)?, id, "not finished"),
        Commands::Delete { id } => {
            let removed = shelf.remove(id)?;
            let note = if removed {
                format!("Deleted book {id}.")
            } else {
                format!("No book {id}; nothing changed.")
            };
            (removed, None, Some(note))
        }
        Commands::Edit {
            id,
            title,
            author,
            year,
        } => {
            let Some(current) = shelf.find_by_id(id).cloned() else {
                return Ok((false, None, Some(format!("No book {id}; nothing changed."))));
            };
            let edit = if title.is_none() && author.is_none() && year.is_none() {
                prompt::ask_edit(&current)?
            } else {
                BookEdit::new(
                    Some(title.unwrap_or(current.title)),
                    Some(author.unwrap_or(current.author)),
                    Some(year.unwrap_or_else(|| current.year.to_string())),
                )
            };
            match shelf.edit(id, &edit)? {
                Some(book) => (true, Some(book), Some(format!("Updated book {id}."))),
                None => (false, None, Some("Edit aborted; nothing changed.".to_string())),
            }
        }
    };
    Ok(outcome)
}

fn flag_outcome(changed: bool, id: BookId, list: &str) -> CommandResult {
    let note = if changed {
        format!("Moved book {id} to {list}.")
    } else {
        format!("No book {id}; nothing changed.")
    };
    (changed, None, Some(note))
}

fn resolve_config(cli: &Cli) -> Result<BookshelfConfig> {
    let mut config = BookshelfConfig::from_env().context("invalid BOOKSHELF_* environment")?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = bookshelf_core::logging::normalize_level(level)?;
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(absolute(dir)?);
    }
    Ok(config)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}
