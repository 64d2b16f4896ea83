//! Core library surface for the Library Book Manager TUI application.
//!
//! The repository and controller are usable without the terminal front-end;
//! the `bin` target only wires them to Ratatui.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod ui;

/// Configuration loading used by `main.rs` before anything else starts.
pub use config::{data_dir_for, default_config_path, load_or_create, DatabaseConfig};

/// The controller and the contract it drives the UI through.
pub use controller::{BookController, BookView, Notice, NoticeKind};

pub use error::{ActionError, StorageError, ValidationError};

/// Domain types that other layers manipulate.
pub use models::{Book, BookDraft, BookFields, BookId};

pub use repository::{BookRepository, Session, SqliteBookRepository};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, BookListScreen};
