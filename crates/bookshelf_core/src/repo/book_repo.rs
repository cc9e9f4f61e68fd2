//! Book repository contract and key/value implementation.
//!
//! # Responsibility
//! - Persist the whole shelf as one JSON array under [`STORAGE_KEY`].
//! - Load blobs written by older shelves, coercing `year` to an integer.
//!
//! # Invariants
//! - Saves always write the complete list; there are no partial updates.
//! - A missing key loads as an empty shelf.
//! - A non-array blob or a record without string title/author is rejected.

use crate::db::{DbError, KeyValueStore};
use crate::model::book::{Book, BookId};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized shelf.
pub const STORAGE_KEY: &str = "BOOKSHELF_APPS";

static INTEGER_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid integer prefix regex"));

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for shelf load/save.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Json(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid shelf json: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Whole-shelf persistence contract.
pub trait BookRepository {
    fn load_books(&self) -> RepoResult<Vec<Book>>;
    fn save_books(&self, books: &[Book]) -> RepoResult<()>;
}

/// Repository storing the shelf in a [`KeyValueStore`].
pub struct KvBookRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvBookRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrows the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> BookRepository for KvBookRepository<S> {
    fn load_books(&self) -> RepoResult<Vec<Book>> {
        let Some(serialized) = self.store.get_item(STORAGE_KEY)? else {
            debug!("event=books_load module=repo status=skip reason=empty_storage");
            return Ok(Vec::new());
        };

        let books = decode_shelf(&serialized)?;
        debug!(
            "event=books_load module=repo status=ok count={}",
            books.len()
        );
        Ok(books)
    }

    fn save_books(&self, books: &[Book]) -> RepoResult<()> {
        let serialized = serde_json::to_string(books)?;
        self.store.set_item(STORAGE_KEY, &serialized)?;
        debug!(
            "event=books_save module=repo status=ok count={} bytes={}",
            books.len(),
            serialized.len()
        );
        Ok(())
    }
}

/// Decodes a serialized shelf blob.
///
/// Lenient where the browser shelf was lenient: `year` may be a number or a
/// numeric-prefixed string and `isComplete` may be absent.
pub fn decode_shelf(serialized: &str) -> RepoResult<Vec<Book>> {
    let value: Value = serde_json::from_str(serialized)?;
    let Value::Array(entries) = value else {
        return Err(RepoError::InvalidData(
            "shelf blob is not a JSON array".to_string(),
        ));
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| decode_book(index, entry))
        .collect()
}

fn decode_book(index: usize, entry: &Value) -> RepoResult<Book> {
    let Value::Object(fields) = entry else {
        return Err(RepoError::InvalidData(format!(
            "entry {index} is not an object"
        )));
    };

    let id = decode_id(index, fields)?;
    let title = decode_string(index, fields, "title")?;
    let author = decode_string(index, fields, "author")?;
    let year = match fields.get("year").and_then(coerce_year) {
        Some(year) => year,
        None => {
            warn!("event=books_load module=repo status=coerced book_id={id} field=year fallback=0");
            0
        }
    };
    let is_complete = match fields.get("isComplete") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(RepoError::InvalidData(format!(
                "entry {index} has non-boolean isComplete `{other}`"
            )));
        }
    };

    Ok(Book {
        id,
        title,
        author,
        year,
        is_complete,
    })
}

fn decode_id(index: usize, fields: &Map<String, Value>) -> RepoResult<BookId> {
    let id = match fields.get("id") {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate_to_i64)),
        _ => None,
    };
    id.ok_or_else(|| RepoError::InvalidData(format!("entry {index} has no numeric id")))
}

fn decode_string(index: usize, fields: &Map<String, Value>, name: &str) -> RepoResult<String> {
    match fields.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        _ => Err(RepoError::InvalidData(format!(
            "entry {index} has no string {name}"
        ))),
    }
}

/// Coerces a stored year the way integer-prefix parsing does.
///
/// Numbers truncate toward zero; strings keep their leading signed digit
/// run. Returns `None` when nothing integral can be read or the value does
/// not fit an `i32`.
pub fn coerce_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(number) => {
            let whole = number
                .as_i64()
                .or_else(|| number.as_f64().and_then(truncate_to_i64))?;
            i32::try_from(whole).ok()
        }
        Value::String(text) => INTEGER_PREFIX_RE
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|digits| digits.as_str().parse::<i32>().ok()),
        _ => None,
    }
}

fn truncate_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}
