//! Bookshelf store service.
//!
//! # Responsibility
//! - Own the in-memory book list and its render listeners.
//! - Re-render and persist after every successful mutation.
//!
//! # Invariants
//! - Mutations on a missing id are no-ops: no render, no save.
//! - Every successful mutation notifies each listener exactly once.
//! - The in-memory list is mutated before persistence; a failed save leaves
//!   the mutation in place and reports `ShelfError::Repo`.
//! - Search renders a filtered view and never mutates the list.

use crate::db::MemoryKeyValueStore;
use crate::model::book::{observe_book_id, Book, BookEdit, BookId, BookValidationError, NewBook};
use crate::render::view::{render_shelf, ShelfView};
use crate::repo::book_repo::{BookRepository, KvBookRepository, RepoError};
use crate::search::title::search_by_title;
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ShelfResult<T> = Result<T, ShelfError>;

/// Callback receiving every rendered view.
pub type RenderListener = Box<dyn FnMut(&ShelfView)>;

/// Store-level error.
#[derive(Debug)]
pub enum ShelfError {
    Validation(BookValidationError),
    Repo(RepoError),
}

impl Display for ShelfError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ShelfError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<BookValidationError> for ShelfError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ShelfError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Stateful shelf: book list, persistence and render fan-out.
pub struct Bookshelf<R: BookRepository> {
    repo: R,
    books: Vec<Book>,
    listeners: Vec<RenderListener>,
}

impl Bookshelf<KvBookRepository<MemoryKeyValueStore>> {
    /// Creates an empty shelf backed by process memory only.
    pub fn detached() -> Self {
        Self {
            repo: KvBookRepository::new(MemoryKeyValueStore::new()),
            books: Vec::new(),
            listeners: Vec::new(),
        }
    }
}

impl<R: BookRepository> Bookshelf<R> {
    /// Loads the persisted shelf through `repo`.
    ///
    /// Loaded ids are fed to the id generator so new books sort after them.
    pub fn load(repo: R) -> ShelfResult<Self> {
        let books = repo.load_books()?;
        for book in &books {
            observe_book_id(book.id);
        }
        info!(
            "event=shelf_load module=service status=ok count={}",
            books.len()
        );
        Ok(Self {
            repo,
            books,
            listeners: Vec::new(),
        })
    }

    /// Registers a listener for subsequent renders.
    pub fn subscribe(&mut self, listener: impl FnMut(&ShelfView) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn find_by_id(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Position of the first book with `id`.
    pub fn find_index_by_id(&self, id: BookId) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }

    /// Builds the full view without notifying listeners.
    pub fn view(&self) -> ShelfView {
        render_shelf(&self.books)
    }

    /// Rebuilds the full view and hands it to every listener.
    pub fn render(&mut self) -> ShelfView {
        let view = self.view();
        self.emit(&view);
        view
    }

    /// Adds a book with a fresh id.
    pub fn add(&mut self, request: NewBook) -> ShelfResult<Book> {
        let book = Book::create(&request)?;
        self.books.push(book.clone());
        self.commit("book_add", book.id)?;
        Ok(book)
    }

    /// Removes the book with `id`. Returns `false` when nothing matched.
    pub fn remove(&mut self, id: BookId) -> ShelfResult<bool> {
        let Some(index) = self.find_index_by_id(id) else {
            return Ok(self.skip("book_remove", id));
        };
        self.books.remove(index);
        self.commit("book_remove", id)?;
        Ok(true)
    }

    /// Sets the completion flag. Returns `false` when nothing matched.
    pub fn toggle_complete(&mut self, id: BookId, value: bool) -> ShelfResult<bool> {
        let Some(index) = self.find_index_by_id(id) else {
            return Ok(self.skip("book_toggle", id));
        };
        self.books[index].is_complete = value;
        self.commit("book_toggle", id)?;
        Ok(true)
    }

    pub fn mark_complete(&mut self, id: BookId) -> ShelfResult<bool> {
        self.toggle_complete(id, true)
    }

    pub fn mark_incomplete(&mut self, id: BookId) -> ShelfResult<bool> {
        self.toggle_complete(id, false)
    }

    /// Applies raw edit answers to the book with `id`.
    ///
    /// Returns `None` when the id is missing or the answers abort the edit;
    /// see [`BookEdit::apply_to`].
    pub fn edit(&mut self, id: BookId, edit: &BookEdit) -> ShelfResult<Option<Book>> {
        let Some(index) = self.find_index_by_id(id) else {
            self.skip("book_edit", id);
            return Ok(None);
        };
        let Some(edited) = edit.apply_to(&self.books[index]) else {
            debug!("event=book_edit module=service status=skip reason=invalid_input book_id={id}");
            return Ok(None);
        };
        self.books[index] = edited.clone();
        self.commit("book_edit", id)?;
        Ok(Some(edited))
    }

    /// Renders only books whose title contains `keyword`, ignoring case.
    pub fn search(&mut self, keyword: &str) -> ShelfView {
        let view = render_shelf(search_by_title(&self.books, keyword));
        debug!(
            "event=book_search module=service status=ok hits={}",
            view.len()
        );
        self.emit(&view);
        view
    }

    fn commit(&mut self, event: &'static str, id: BookId) -> ShelfResult<()> {
        self.render();
        if let Err(err) = self.repo.save_books(&self.books) {
            error!("event={event} module=service status=error book_id={id} error={err}");
            return Err(err.into());
        }
        info!(
            "event={event} module=service status=ok book_id={id} count={}",
            self.books.len()
        );
        Ok(())
    }

    fn skip(&self, event: &'static str, id: BookId) -> bool {
        debug!("event={event} module=service status=skip reason=not_found book_id={id}");
        false
    }

    fn emit(&mut self, view: &ShelfView) {
        for listener in &mut self.listeners {
            listener(view);
        }
    }
}
