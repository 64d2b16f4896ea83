use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::Connection;

use crate::error::{QueryContext, StorageError};

/// Extension appended to the configured database name.
const DB_FILE_EXTENSION: &str = "sqlite";

/// Resolve the SQLite file backing the named database inside `data_dir`.
pub fn database_path(data_dir: &Path, database: &str) -> PathBuf {
    data_dir.join(format!("{database}.{DB_FILE_EXTENSION}"))
}

/// Open the database file, creating its folder if needed, and make sure the
/// `books` table exists. Failures here are connection failures: no session
/// was established.
pub fn open_database(path: &Path) -> Result<Connection, StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                StorageError::Connection(format!(
                    "failed to create data directory `{}`: {err}",
                    parent.display()
                ))
            })?;
        }
    }

    let conn = Connection::open(path).map_err(|err| {
        StorageError::Connection(format!("failed to open `{}`: {err}", path.display()))
    })?;
    ensure_schema(&conn).map_err(|err| StorageError::Connection(err.to_string()))?;
    debug!(
        "event=db_open module=db status=ok path={}",
        path.display()
    );
    Ok(conn)
}

/// Create the `books` table on a fresh file. Existing tables are left as they
/// are. The `CHECK` constraints back the rule that title, author, and genre
/// are never empty for a stored row.
pub fn ensure_schema(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            book_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL CHECK (title <> ''),
            author TEXT NOT NULL CHECK (author <> ''),
            genre TEXT NOT NULL CHECK (genre <> ''),
            publication_year INTEGER,
            isbn TEXT
        )",
        [],
    )
    .query_context("failed to create books table")?;
    Ok(())
}
