//! Core domain logic for the bookshelf manager.
//! This crate is the single source of truth for shelf invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod render;
pub mod repo;
pub mod search;
pub mod service;

pub use config::BookshelfConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookEdit, BookId, BookValidationError, NewBook};
pub use render::view::{render_shelf, render_text, BookAction, BookCard, ShelfView};
pub use repo::book_repo::{BookRepository, KvBookRepository, RepoError, RepoResult, STORAGE_KEY};
pub use search::title::{search_by_title, title_matches};
pub use service::shelf_service::{Bookshelf, RenderListener, ShelfError, ShelfResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
