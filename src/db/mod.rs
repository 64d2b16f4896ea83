//! Persistence module split across logical submodules: opening the SQLite
//! file and the five statements issued against the `books` table.

mod books;
mod connection;

pub use books::{create_book, delete_book, fetch_books, like_pattern, search_books, update_book};
pub use connection::{database_path, ensure_schema, open_database};
