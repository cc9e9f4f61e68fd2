//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the shelf form and per-book buttons as sync FRB calls.
//! - Return flat envelopes the UI can render without further lookups.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Shelf calls are serialized in-process; each call loads, mutates and
//!   saves the whole shelf under one lock.
//! - Missing ids report `ok = true, changed = false`.

use bookshelf_core::db::{open_db, SqliteKeyValueStore};
use bookshelf_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, BookCard, BookEdit,
    BookId, Bookshelf, BookshelfConfig, KvBookRepository, NewBook, ShelfView,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

static SHELF_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SHELF_LOCK: Mutex<()> = Mutex::new(());

type SqliteShelf<'conn> = Bookshelf<KvBookRepository<SqliteKeyValueStore<'conn>>>;

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling log files.
/// - Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One rendered book card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfItem {
    /// Element id, `book-{id}`.
    pub element_id: String,
    pub book_id: i64,
    pub title: String,
    pub author_line: String,
    pub year_line: String,
    /// Button captions in display order.
    pub actions: Vec<String>,
}

/// Two-list view returned by render and search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfViewResponse {
    pub incomplete: Vec<ShelfItem>,
    pub complete: Vec<ShelfItem>,
    /// Human-readable diagnostics.
    pub message: String,
}

/// Result of one button or form action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfActionResponse {
    /// Whether the call completed without error.
    pub ok: bool,
    /// Whether the shelf was modified.
    pub changed: bool,
    /// Affected book id when the shelf changed.
    pub book_id: Option<i64>,
    pub message: String,
}

impl ShelfActionResponse {
    fn changed(message: impl Into<String>, book_id: BookId) -> Self {
        Self {
            ok: true,
            changed: true,
            book_id: Some(book_id),
            message: message.into(),
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            changed: false,
            book_id: None,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            changed: false,
            book_id: None,
            message: message.into(),
        }
    }
}

/// Submits the add-book form.
#[flutter_rust_bridge::frb(sync)]
pub fn shelf_add_book(
    title: String,
    author: String,
    year: i32,
    is_complete: bool,
) -> ShelfActionResponse {
    let request = NewBook::new(title, author, year, is_complete);
    match with_shelf(|shelf| shelf.add(request).map_err(|err| err.to_string())) {
        Ok(book) => ShelfActionResponse::changed("Book added.", book.id),
        Err(err) => ShelfActionResponse::failure(format!("shelf_add_book failed: {err}")),
    }
}

/// Delete button.
#[flutter_rust_bridge::frb(sync)]
pub fn shelf_remove_book(book_id: i64) -> ShelfActionResponse {
    flag_action("shelf_remove_book", "Book removed.", book_id, |shelf| {
        shelf.remove(book_id)
    })
}

/// "Finished reading" button.
#[flutter_rust_bridge::frb(sync)]
pub fn shelf_mark_complete(book_id: i64) -> ShelfActionResponse {
    flag_action(
        "shelf_mark_complete",
        "Book marked as finished.",
        book_id,
        |shelf| shelf.mark_complete(book_id),
    )
}

/// "Not finished" button.
#[flutter_rust_bridge::frb(sync)]
pub fn shelf_mark_incomplete(book_id: i64) -> ShelfActionResponse {
    flag_action(
        "shelf_mark_incomplete",
        "Book moved back to not finished.",
        book_id,
        |shelf| shelf.mark_incomplete(book_id),
    )
}

/// Edit button, fed with the three prompt answers.
///
/// `None` answers are cancelled prompts and abort the edit.
#[flutter_rust_bridge::frb(sync)]
pub fn shelf_edit_book(
    book_id: i64,
    title: Option<String>,
    author: Option<String>,
    year: Option<String>,
) -> ShelfActionResponse {
    let edit = BookEdit::new(title, author, year);
    match with_shelf(|shelf| shelf.edit(book_id, &edit).map_err(|err| err.to_string())) {
        Ok(Some(book)) => ShelfActionResponse::changed("Book updated.", book.id),
        Ok(None) => ShelfActionResponse::unchanged("Nothing changed."),
        Err(err) => ShelfActionResponse::failure(format!("shelf_edit_book failed: {err}")),
    }
}

/// Renders the whole shelf.
#[flutter_rust_bridge::frb(sync)]
pub fn shelf_render() -> ShelfViewResponse {
    view_response("shelf_render", |shelf| shelf.render())
}

/// Renders books whose title contains `keyword`, ignoring case.
#[flutter_rust_bridge::frb(sync)]
pub fn shelf_search(keyword: String) -> ShelfViewResponse {
    view_response("shelf_search", |shelf| shelf.search(&keyword))
}

fn flag_action(
    name: &str,
    success: &str,
    book_id: BookId,
    f: impl FnOnce(&mut SqliteShelf<'_>) -> bookshelf_core::ShelfResult<bool>,
) -> ShelfActionResponse {
    match with_shelf(|shelf| f(shelf).map_err(|err| err.to_string())) {
        Ok(true) => ShelfActionResponse::changed(success, book_id),
        Ok(false) => ShelfActionResponse::unchanged("Nothing changed."),
        Err(err) => ShelfActionResponse::failure(format!("{name} failed: {err}")),
    }
}

fn view_response(
    name: &str,
    f: impl FnOnce(&mut SqliteShelf<'_>) -> ShelfView,
) -> ShelfViewResponse {
    match with_shelf(|shelf| Ok(f(shelf))) {
        Ok(view) => {
            let message = if view.is_empty() {
                "No books.".to_string()
            } else {
                format!("Showing {} book(s).", view.len())
            };
            ShelfViewResponse {
                incomplete: view.incomplete.iter().map(to_shelf_item).collect(),
                complete: view.complete.iter().map(to_shelf_item).collect(),
                message,
            }
        }
        Err(err) => ShelfViewResponse {
            incomplete: Vec::new(),
            complete: Vec::new(),
            message: format!("{name} failed: {err}"),
        },
    }
}

fn with_shelf<T>(
    f: impl FnOnce(&mut SqliteShelf<'_>) -> Result<T, String>,
) -> Result<T, String> {
    let _guard = SHELF_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db(resolve_shelf_db_path())
        .map_err(|err| format!("shelf storage open failed: {err}"))?;
    let mut shelf = Bookshelf::load(KvBookRepository::new(SqliteKeyValueStore::new(&conn)))
        .map_err(|err| format!("shelf load failed: {err}"))?;
    f(&mut shelf)
}

fn resolve_shelf_db_path() -> &'static PathBuf {
    SHELF_DB_PATH.get_or_init(|| match BookshelfConfig::from_env() {
        Ok(config) => config.db_path,
        Err(err) => {
            warn!("event=config_resolve module=ffi status=error error={err}");
            bookshelf_core::config::default_db_path()
        }
    })
}

fn to_shelf_item(card: &BookCard) -> ShelfItem {
    ShelfItem {
        element_id: card.element_id.clone(),
        book_id: card.book_id,
        title: card.title.clone(),
        author_line: card.author_line.clone(),
        year_line: card.year_line.clone(),
        actions: card
            .actions
            .iter()
            .map(|action| action.label().to_string())
            .collect(),
    }
}
