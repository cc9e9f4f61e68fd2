//! Book domain model.
//!
//! # Responsibility
//! - Define the book record and its wire shape.
//! - Generate timestamp-based ids.
//! - Resolve raw edit input into an updated record.
//!
//! # Invariants
//! - `is_complete` is serialized as `isComplete` so blobs written by the
//!   browser shelf load unchanged.
//! - `title` and `author` of a newly added book are non-blank.
//! - Ids are not checked for uniqueness across loaded data.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Epoch-millisecond identifier of a book.
pub type BookId = i64;

static LAST_ISSUED_ID: AtomicI64 = AtomicI64::new(0);

/// One shelf entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    #[serde(rename = "isComplete")]
    pub is_complete: bool,
}

/// Validation error for book creation input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    BlankTitle,
    BlankAuthor,
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "book title cannot be blank"),
            Self::BlankAuthor => write!(f, "book author cannot be blank"),
        }
    }
}

impl Error for BookValidationError {}

/// Creation request, the fields of the add-book form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub is_complete: bool,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
        is_complete: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            is_complete,
        }
    }
}

impl Book {
    /// Builds a book from a creation request under a freshly generated id.
    ///
    /// # Errors
    /// - Returns `BlankTitle` / `BlankAuthor` for whitespace-only input.
    pub fn create(request: &NewBook) -> Result<Self, BookValidationError> {
        let book = Self {
            id: generate_book_id(),
            title: request.title.clone(),
            author: request.author.clone(),
            year: request.year,
            is_complete: request.is_complete,
        };
        book.validate()?;
        Ok(book)
    }

    /// Checks creation invariants.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::BlankTitle);
        }
        if self.author.trim().is_empty() {
            return Err(BookValidationError::BlankAuthor);
        }
        Ok(())
    }
}

/// Raw answers of the three edit prompts.
///
/// `None` means the prompt was cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookEdit {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<String>,
}

impl BookEdit {
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        year: Option<String>,
    ) -> Self {
        Self {
            title,
            author,
            year,
        }
    }

    /// Applies the answers to `current`, returning the edited copy.
    ///
    /// Returns `None` when the edit must be aborted:
    /// - title or author cancelled or empty;
    /// - year cancelled, non-blank and not a finite number, or outside `i32`.
    ///
    /// Whitespace-only title/author and a blank year keep the current value.
    /// Fractional years truncate toward zero (`"1969.5"` becomes 1969).
    pub fn apply_to(&self, current: &Book) -> Option<Book> {
        let title = resolve_text(self.title.as_deref(), &current.title)?;
        let author = resolve_text(self.author.as_deref(), &current.author)?;
        let year = resolve_year(self.year.as_deref()?, current.year)?;

        Some(Book {
            id: current.id,
            title,
            author,
            year,
            is_complete: current.is_complete,
        })
    }
}

fn resolve_text(answer: Option<&str>, current: &str) -> Option<String> {
    let answer = answer.filter(|value| !value.is_empty())?;
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        Some(current.to_string())
    } else {
        Some(trimmed.to_string())
    }
}

fn resolve_year(answer: &str, current: i32) -> Option<i32> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Some(current);
    }
    let value = trimmed.parse::<f64>().ok().filter(|value| value.is_finite())?;
    let whole = value.trunc();
    if whole < f64::from(i32::MIN) || whole > f64::from(i32::MAX) {
        return None;
    }
    Some(whole as i32)
}

/// Issues a new timestamp-based id.
///
/// Falls back to `last + 1` when the clock has not advanced past the last
/// issued (or observed) id.
pub fn generate_book_id() -> BookId {
    let now = now_epoch_ms();
    let previous = LAST_ISSUED_ID
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(next_id(now, last))
        })
        .unwrap_or_else(|last| last);
    next_id(now, previous)
}

/// Records an externally sourced id so later generated ids stay above it.
pub fn observe_book_id(id: BookId) {
    LAST_ISSUED_ID.fetch_max(id, Ordering::Relaxed);
}

fn next_id(now: i64, last: i64) -> i64 {
    if now > last {
        now
    } else {
        last.saturating_add(1)
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

#[cfg(test)]
mod tests {
    use super::{generate_book_id, next_id, Book, BookEdit};

    fn sample() -> Book {
        Book {
            id: 7,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            is_complete: false,
        }
    }

    #[test]
    fn generated_ids_are_strictly_increasing() {
        let first = generate_book_id();
        let second = generate_book_id();
        let third = generate_book_id();
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn next_id_bumps_when_clock_stalls() {
        assert_eq!(next_id(100, 50), 100);
        assert_eq!(next_id(100, 100), 101);
        assert_eq!(next_id(100, 250), 251);
    }

    #[test]
    fn edit_trims_answers() {
        let edit = BookEdit::new(
            Some("  Dune Messiah ".to_string()),
            Some("Herbert".to_string()),
            Some(" 1969 ".to_string()),
        );
        let edited = edit.apply_to(&sample()).expect("edit should apply");
        assert_eq!(edited.title, "Dune Messiah");
        assert_eq!(edited.author, "Herbert");
        assert_eq!(edited.year, 1969);
        assert_eq!(edited.id, 7);
    }

    #[test]
    fn edit_keeps_current_values_for_whitespace_and_blank_year() {
        let edit = BookEdit::new(
            Some("   ".to_string()),
            Some(" ".to_string()),
            Some(String::new()),
        );
        let edited = edit.apply_to(&sample()).expect("edit should apply");
        assert_eq!(edited, sample());
    }

    #[test]
    fn edit_aborts_on_cancel_empty_or_non_numeric_year() {
        let book = sample();
        let cancelled = BookEdit::new(None, Some("a".to_string()), Some("1".to_string()));
        assert!(cancelled.apply_to(&book).is_none());

        let empty_author = BookEdit::new(
            Some("t".to_string()),
            Some(String::new()),
            Some("1".to_string()),
        );
        assert!(empty_author.apply_to(&book).is_none());

        let bad_year = BookEdit::new(
            Some("t".to_string()),
            Some("a".to_string()),
            Some("nineteen".to_string()),
        );
        assert!(bad_year.apply_to(&book).is_none());

        let cancelled_year = BookEdit::new(Some("t".to_string()), Some("a".to_string()), None);
        assert!(cancelled_year.apply_to(&book).is_none());

        for year in ["inf", "NaN", "1e12", "-3000000000"] {
            let edit = BookEdit::new(
                Some("t".to_string()),
                Some("a".to_string()),
                Some(year.to_string()),
            );
            assert!(edit.apply_to(&book).is_none(), "year {year} should abort");
        }
    }

    #[test]
    fn edit_accepts_any_finite_numeric_year() {
        let cases = [("1969.0", 1969), ("1969.5", 1969), ("1e3", 1000), ("-44.9", -44)];
        for (answer, expected) in cases {
            let edit = BookEdit::new(
                Some("Dune".to_string()),
                Some("Herbert".to_string()),
                Some(answer.to_string()),
            );
            let edited = edit.apply_to(&sample()).expect("numeric year should apply");
            assert_eq!(edited.year, expected, "answer {answer}");
        }
    }
}
