use bookshelf_core::db::{open_db, open_db_in_memory, KeyValueStore, SqliteKeyValueStore};
use bookshelf_core::{Book, BookRepository, KvBookRepository, STORAGE_KEY};

fn book(id: i64, title: &str, year: i32, is_complete: bool) -> Book {
    Book {
        id,
        title: title.to_string(),
        author: "Author".to_string(),
        year,
        is_complete,
    }
}

#[test]
fn missing_key_loads_empty_shelf() {
    let conn = open_db_in_memory().unwrap();
    let repo = KvBookRepository::new(SqliteKeyValueStore::new(&conn));

    assert!(repo.load_books().unwrap().is_empty());
}

#[test]
fn save_writes_one_json_array_under_storage_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = KvBookRepository::new(SqliteKeyValueStore::new(&conn));

    repo.save_books(&[book(1, "One", 2001, false), book(2, "Two", 2002, true)])
        .unwrap();

    let raw = repo.store().get_item(STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entries = value.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["isComplete"], true);
}

#[test]
fn reload_from_file_reproduces_saved_books_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shelf.sqlite3");
    let saved = vec![
        book(30, "Gamma", 1990, false),
        book(10, "Alpha", 1970, true),
        book(20, "Beta", 1980, false),
    ];

    {
        let conn = open_db(&path).unwrap();
        KvBookRepository::new(SqliteKeyValueStore::new(&conn))
            .save_books(&saved)
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let loaded = KvBookRepository::new(SqliteKeyValueStore::new(&conn))
        .load_books()
        .unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn load_coerces_string_years_written_by_edits() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    store
        .set_item(
            STORAGE_KEY,
            r#"[
                {"id": 1, "title": "A", "author": "x", "year": "1999", "isComplete": false},
                {"id": 2, "title": "B", "author": "y", "year": 2004.0, "isComplete": true}
            ]"#,
        )
        .unwrap();

    let loaded = KvBookRepository::new(&store).load_books().unwrap();
    assert_eq!(loaded[0].year, 1999);
    assert_eq!(loaded[1].year, 2004);
    assert!(loaded[1].is_complete);
}

#[test]
fn load_rejects_corrupt_blob() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    store.set_item(STORAGE_KEY, "not json").unwrap();

    assert!(KvBookRepository::new(&store).load_books().is_err());
}
