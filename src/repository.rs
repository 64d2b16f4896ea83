//! Repository contract for the book store and its SQLite implementation.
//!
//! # Invariants
//! - Data operations never open a connection on their own; callers connect
//!   first (usually through [`Session`]).
//! - Every operation issues exactly one parameterized statement and relies on
//!   autocommit.
//! - `update`/`delete` return `Ok(false)` when no row matched the id.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rusqlite::Connection;

use crate::config::DatabaseConfig;
use crate::db::{
    create_book, database_path, delete_book, fetch_books, open_database, search_books,
    update_book,
};
use crate::error::StorageError;
use crate::models::{Book, BookDraft, BookId};

/// Data access for the `books` table.
pub trait BookRepository {
    /// Open the session. Reuses an open session.
    fn connect(&mut self) -> Result<(), StorageError>;
    /// Close the session if open. Close failures are logged, never returned.
    fn disconnect(&mut self);
    /// All books ordered by title.
    fn list_all(&self) -> Result<Vec<Book>, StorageError>;
    /// Books whose title, author, or genre contains `term`, ordered by title.
    fn search(&self, term: &str) -> Result<Vec<Book>, StorageError>;
    /// Insert a book and return its new id.
    fn create(&mut self, draft: &BookDraft) -> Result<BookId, StorageError>;
    /// Replace all editable fields of `id`.
    fn update(&mut self, id: BookId, draft: &BookDraft) -> Result<bool, StorageError>;
    /// Hard-delete `id`.
    fn delete(&mut self, id: BookId) -> Result<bool, StorageError>;
}

/// Scoped connection: connects on open, disconnects on drop, whichever way
/// the unit of work ends.
pub struct Session<'r, R: BookRepository + ?Sized> {
    repo: &'r mut R,
}

impl<'r, R: BookRepository + ?Sized> Session<'r, R> {
    pub fn open(repo: &'r mut R) -> Result<Self, StorageError> {
        repo.connect()?;
        Ok(Self { repo })
    }
}

impl<R: BookRepository + ?Sized> Deref for Session<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.repo
    }
}

impl<R: BookRepository + ?Sized> DerefMut for Session<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.repo
    }
}

impl<R: BookRepository + ?Sized> Drop for Session<'_, R> {
    fn drop(&mut self) {
        self.repo.disconnect();
    }
}

/// SQLite-backed repository. The configured database name selects a file
/// inside `data_dir`; host and user are only used for diagnostics.
pub struct SqliteBookRepository {
    config: DatabaseConfig,
    path: PathBuf,
    conn: Option<Connection>,
}

impl SqliteBookRepository {
    pub fn new(config: DatabaseConfig, data_dir: &Path) -> Self {
        let path = database_path(data_dir, &config.database);
        Self {
            config,
            path,
            conn: None,
        }
    }

    /// Location of the backing SQLite file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&self) -> Result<&Connection, StorageError> {
        self.conn
            .as_ref()
            .ok_or_else(|| StorageError::Connection("not connected".to_string()))
    }
}

impl BookRepository for SqliteBookRepository {
    fn connect(&mut self) -> Result<(), StorageError> {
        if self.conn.is_some() {
            return Ok(());
        }
        let conn = open_database(&self.path)?;
        debug!(
            "event=connect module=repository status=ok target={}",
            self.config.describe()
        );
        self.conn = Some(conn);
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, err)) = conn.close() {
                warn!(
                    "event=disconnect module=repository status=error error={}",
                    err
                );
            } else {
                debug!("event=disconnect module=repository status=ok");
            }
        }
    }

    fn list_all(&self) -> Result<Vec<Book>, StorageError> {
        fetch_books(self.conn()?)
    }

    fn search(&self, term: &str) -> Result<Vec<Book>, StorageError> {
        search_books(self.conn()?, term)
    }

    fn create(&mut self, draft: &BookDraft) -> Result<BookId, StorageError> {
        let id = create_book(self.conn()?, draft)?;
        info!("event=book_create module=repository status=ok book_id={id}");
        Ok(id)
    }

    fn update(&mut self, id: BookId, draft: &BookDraft) -> Result<bool, StorageError> {
        let updated = update_book(self.conn()?, id, draft)?;
        info!("event=book_update module=repository status=ok book_id={id} matched={updated}");
        Ok(updated)
    }

    fn delete(&mut self, id: BookId) -> Result<bool, StorageError> {
        let deleted = delete_book(self.conn()?, id)?;
        info!("event=book_delete module=repository status=ok book_id={id} matched={deleted}");
        Ok(deleted)
    }
}

impl Drop for SqliteBookRepository {
    fn drop(&mut self) {
        self.disconnect();
    }
}
