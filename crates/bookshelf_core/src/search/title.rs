//! Linear title matcher.
//!
//! # Invariants
//! - Only `title` is matched; author and year are ignored.
//! - An empty keyword matches every book.
//! - Matches keep shelf order.

use crate::model::book::Book;

/// Returns whether `title` contains `keyword`, ignoring case.
pub fn title_matches(title: &str, keyword: &str) -> bool {
    contains_folded(title, &keyword.to_lowercase())
}

/// Returns the books whose title contains `keyword`, ignoring case.
pub fn search_by_title<'a>(books: &'a [Book], keyword: &str) -> Vec<&'a Book> {
    let needle = keyword.to_lowercase();
    books
        .iter()
        .filter(|book| contains_folded(&book.title, &needle))
        .collect()
}

// `needle` must already be lowercased.
fn contains_folded(title: &str, needle: &str) -> bool {
    needle.is_empty() || title.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::{search_by_title, title_matches};
    use crate::model::book::Book;

    fn book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: "Someone".to_string(),
            year: 2000,
            is_complete: false,
        }
    }

    #[test]
    fn matching_ignores_case() {
        assert!(title_matches("The Hobbit", "hobb"));
        assert!(title_matches("the hobbit", "HOBBIT"));
        assert!(!title_matches("The Hobbit", "tolkien"));
    }

    #[test]
    fn empty_keyword_matches_anything() {
        assert!(title_matches("Anything", ""));
        assert!(title_matches("", ""));
    }

    #[test]
    fn matching_handles_non_ascii_case() {
        assert!(title_matches("ÉTUDES", "études"));
    }

    #[test]
    fn search_agrees_with_title_matches_and_keeps_order() {
        let books = vec![book(1, "Dune"), book(2, "The Hobbit"), book(3, "Hobbit Companion")];

        let hits = search_by_title(&books, "HOBBIT");
        let ids: Vec<i64> = hits.iter().map(|book| book.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(hits.iter().all(|book| title_matches(&book.title, "HOBBIT")));

        assert_eq!(search_by_title(&books, "").len(), 3);
    }
}
