use bookshelf_core::{render_shelf, search_by_title, Book};

fn shelf() -> Vec<Book> {
    [
        ("Bumi Manusia", "Pramoedya", false),
        ("Anak Semua Bangsa", "Pramoedya", true),
        ("Manusia Harimau", "Eka", false),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (title, author, is_complete))| Book {
        id: index as i64 + 1,
        title: title.to_string(),
        author: author.to_string(),
        year: 1980,
        is_complete,
    })
    .collect()
}

#[test]
fn search_matches_title_substrings_case_insensitively() {
    let books = shelf();
    let hits = search_by_title(&books, "MANUSIA");
    let ids: Vec<i64> = hits.iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn search_ignores_author() {
    let books = shelf();
    assert!(search_by_title(&books, "pramoedya").is_empty());
}

#[test]
fn empty_keyword_returns_whole_shelf() {
    let books = shelf();
    assert_eq!(search_by_title(&books, "").len(), books.len());
}

#[test]
fn filtered_render_keeps_partitions() {
    let books = shelf();
    let view = render_shelf(search_by_title(&books, "a"));
    assert_eq!(view.incomplete.len(), 2);
    assert_eq!(view.complete.len(), 1);
    assert_eq!(view.complete[0].element_id, "book-2");
}
