//! View models produced by every render.

use crate::model::book::{Book, BookId};
use serde::Serialize;
use std::fmt::{self, Write};

/// Per-card button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookAction {
    /// Shown on incomplete books.
    MarkComplete,
    /// Shown on complete books.
    MarkIncomplete,
    Edit,
    Delete,
}

impl BookAction {
    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::MarkComplete => "Finished reading",
            Self::MarkIncomplete => "Not finished",
            Self::Edit => "Edit book",
            Self::Delete => "Delete book",
        }
    }
}

/// Rendered shelf entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookCard {
    /// Stable element id, `book-{id}`.
    pub element_id: String,
    pub book_id: BookId,
    pub title: String,
    pub author_line: String,
    pub year_line: String,
    pub is_complete: bool,
    /// Toggle first, then edit, then delete.
    pub actions: Vec<BookAction>,
}

/// The two lists shown on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShelfView {
    pub incomplete: Vec<BookCard>,
    pub complete: Vec<BookCard>,
}

impl ShelfView {
    /// Total cards across both lists.
    pub fn len(&self) -> usize {
        self.incomplete.len() + self.complete.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incomplete.is_empty() && self.complete.is_empty()
    }

    /// Finds a card by book id in either list.
    pub fn card(&self, id: BookId) -> Option<&BookCard> {
        self.incomplete
            .iter()
            .chain(self.complete.iter())
            .find(|card| card.book_id == id)
    }
}

/// Builds a view by partitioning `books` on completion.
pub fn render_shelf<'a>(books: impl IntoIterator<Item = &'a Book>) -> ShelfView {
    let mut view = ShelfView::default();
    for book in books {
        let card = make_card(book);
        if book.is_complete {
            view.complete.push(card);
        } else {
            view.incomplete.push(card);
        }
    }
    view
}

/// Builds one card.
pub fn make_card(book: &Book) -> BookCard {
    let toggle = if book.is_complete {
        BookAction::MarkIncomplete
    } else {
        BookAction::MarkComplete
    };

    BookCard {
        element_id: format!("book-{}", book.id),
        book_id: book.id,
        title: book.title.clone(),
        author_line: format!("Author: {}", book.author),
        year_line: format!("Year: {}", book.year),
        is_complete: book.is_complete,
        actions: vec![toggle, BookAction::Edit, BookAction::Delete],
    }
}

/// Formats a view for terminal output.
pub fn render_text(view: &ShelfView) -> String {
    view.to_string()
}

impl fmt::Display for ShelfView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_section(f, "Not finished", &self.incomplete)?;
        writeln!(f)?;
        write_section(f, "Finished", &self.complete)
    }
}

fn write_section(out: &mut dyn Write, heading: &str, cards: &[BookCard]) -> fmt::Result {
    writeln!(out, "{heading} ({})", cards.len())?;
    if cards.is_empty() {
        return writeln!(out, "  (empty)");
    }
    for card in cards {
        writeln!(out, "  [{}] {}", card.book_id, card.title)?;
        writeln!(out, "      {}", card.author_line)?;
        writeln!(out, "      {}", card.year_line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{make_card, render_text, BookAction, ShelfView};
    use crate::model::book::Book;

    fn book(id: i64, is_complete: bool) -> Book {
        Book {
            id,
            title: format!("Title {id}"),
            author: "Someone".to_string(),
            year: 2000,
            is_complete,
        }
    }

    #[test]
    fn card_toggle_depends_on_completion() {
        let open = make_card(&book(1, false));
        assert_eq!(open.element_id, "book-1");
        assert_eq!(
            open.actions,
            vec![BookAction::MarkComplete, BookAction::Edit, BookAction::Delete]
        );

        let done = make_card(&book(2, true));
        assert_eq!(done.actions[0], BookAction::MarkIncomplete);
        assert_eq!(done.year_line, "Year: 2000");
    }

    #[test]
    fn text_marks_empty_sections() {
        let text = render_text(&ShelfView::default());
        assert!(text.contains("Not finished (0)"));
        assert!(text.contains("(empty)"));
    }

    #[test]
    fn text_lists_cards_under_their_section() {
        let view = ShelfView {
            incomplete: vec![make_card(&book(1, false))],
            complete: vec![make_card(&book(2, true))],
        };
        let text = render_text(&view);
        assert_eq!(
            text,
            "Not finished (1)\n  [1] Title 1\n      Author: Someone\n      Year: 2000\n\n\
             Finished (1)\n  [2] Title 2\n      Author: Someone\n      Year: 2000\n"
        );
    }
}
