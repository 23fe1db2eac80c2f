use std::path::Path;

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::model::{BookRecord, StoredBook};

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS books (
            id          INTEGER PRIMARY KEY,
            isbn        TEXT,
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            language    TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_books_title ON books(title);
        ",
    )?;
    Ok(())
}

const BOOK_COLUMNS: &str = "id, title, description, language, isbn";

fn book_from_row(row: &Row) -> rusqlite::Result<StoredBook> {
    Ok(StoredBook {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        language: row.get(3)?,
        isbn: row.get(4)?,
    })
}

/// Insert without any duplicate check.
pub fn insert_book(conn: &Connection, book: &BookRecord) -> Result<StoredBook> {
    conn.execute(
        "INSERT INTO books (isbn, title, description, language) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![book.isbn, book.title, book.description, book.language],
    )?;
    Ok(StoredBook {
        id: conn.last_insert_rowid(),
        title: book.title.clone(),
        description: book.description.clone(),
        language: book.language.clone(),
        isbn: Some(book.isbn.clone()),
    })
}

/// Return the stored book with the same title, or insert this one.
pub fn store_or_retrieve_by_title(conn: &Connection, book: &BookRecord) -> Result<StoredBook> {
    let existing = conn
        .query_row(
            &format!("SELECT {} FROM books WHERE title = ?1 ORDER BY id LIMIT 1", BOOK_COLUMNS),
            rusqlite::params![book.title],
            book_from_row,
        )
        .optional()?;

    match existing {
        Some(stored) => Ok(stored),
        None => insert_book(conn, book),
    }
}

pub fn fetch_all(conn: &Connection) -> Result<Vec<StoredBook>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS))?;
    let rows = stmt
        .query_map([], book_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<StoredBook>> {
    let book = conn
        .query_row(
            &format!("SELECT {} FROM books WHERE id = ?1", BOOK_COLUMNS),
            rusqlite::params![id],
            book_from_row,
        )
        .optional()?;
    Ok(book)
}
