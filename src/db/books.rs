use rusqlite::{params, Connection, Row};

use crate::error::{QueryContext, StorageError};
use crate::models::{Book, BookDraft, BookId};

/// Character used to escape LIKE wildcards typed by the user.
const LIKE_ESCAPE: char = '\\';

/// Retrieve every book sorted by title, ignoring ASCII case.
pub fn fetch_books(conn: &Connection) -> Result<Vec<Book>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT book_id, title, author, genre, publication_year, isbn
             FROM books
             ORDER BY title COLLATE NOCASE",
        )
        .query_context("failed to prepare book query")?;

    let books = stmt
        .query_map([], book_from_row)
        .query_context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .query_context("failed to collect books")?;

    Ok(books)
}

/// Books whose title, author, or genre contains `term`, sorted like
/// [`fetch_books`].
///
/// SQLite's `LIKE` folds case for ASCII letters only: "emile" finds "Emile",
/// but "émile" does not find "Émile".
pub fn search_books(conn: &Connection, term: &str) -> Result<Vec<Book>, StorageError> {
    let mut stmt = conn
        .prepare(
            "SELECT book_id, title, author, genre, publication_year, isbn
             FROM books
             WHERE title LIKE ?1 ESCAPE '\\'
                OR author LIKE ?1 ESCAPE '\\'
                OR genre LIKE ?1 ESCAPE '\\'
             ORDER BY title COLLATE NOCASE",
        )
        .query_context("failed to prepare search query")?;

    let books = stmt
        .query_map([like_pattern(term)], book_from_row)
        .query_context("failed to search books")?
        .collect::<Result<Vec<_>, _>>()
        .query_context("failed to collect search results")?;

    Ok(books)
}

/// Insert a new row and return the id SQLite assigned to it.
pub fn create_book(conn: &Connection, draft: &BookDraft) -> Result<BookId, StorageError> {
    conn.execute(
        "INSERT INTO books (title, author, genre, publication_year, isbn)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            draft.title,
            draft.author,
            draft.genre,
            draft.publication_year,
            draft.isbn
        ],
    )
    .query_context("failed to insert book")?;

    Ok(conn.last_insert_rowid())
}

/// Replace every editable field of a book. Returns `false` when no row has
/// this id.
pub fn update_book(conn: &Connection, id: BookId, draft: &BookDraft) -> Result<bool, StorageError> {
    let updated = conn
        .execute(
            "UPDATE books
             SET title = ?1, author = ?2, genre = ?3, publication_year = ?4, isbn = ?5
             WHERE book_id = ?6",
            params![
                draft.title,
                draft.author,
                draft.genre,
                draft.publication_year,
                draft.isbn,
                id
            ],
        )
        .query_context("failed to update book")?;

    Ok(updated > 0)
}

/// Permanently delete a book. Returns `false` when no row has this id.
pub fn delete_book(conn: &Connection, id: BookId) -> Result<bool, StorageError> {
    let deleted = conn
        .execute("DELETE FROM books WHERE book_id = ?1", params![id])
        .query_context("failed to delete book")?;

    Ok(deleted > 0)
}

/// Wrap a search term in `%` after escaping the LIKE metacharacters, so `%`
/// and `_` typed by the user match literally.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        genre: row.get(3)?,
        publication_year: row.get(4)?,
        isbn: row.get(5)?,
    })
}
