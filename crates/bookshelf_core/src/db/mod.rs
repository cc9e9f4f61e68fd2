//! Local storage for the shelf: one SQLite file holding string keys.
//!
//! The browser keeps the shelf in `localStorage`; here that role is played
//! by the `local_storage` table, reached only through [`KeyValueStore`].
//!
//! # Invariants
//! - A connection is handed out only after its schema is current.
//! - Schema version lives in `PRAGMA user_version`; files from a newer
//!   build are refused rather than downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod kv;
pub mod migrations;
mod open;

pub use kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage failure.
#[derive(Debug)]
pub enum DbError {
    /// Opening the file or migrating it failed.
    Sqlite(rusqlite::Error),
    /// A `get`/`set`/`remove` on one key failed.
    Item {
        op: &'static str,
        key: String,
        source: rusqlite::Error,
    },
    /// The file carries a schema this build does not know.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    pub(crate) fn item(op: &'static str, key: &str) -> impl FnOnce(rusqlite::Error) -> Self {
        let key = key.to_string();
        move |source| Self::Item { op, key, source }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Item { op, key, source } => {
                write!(f, "local storage {op} of `{key}` failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "local storage schema v{found} is newer than this build supports (v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Item { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
