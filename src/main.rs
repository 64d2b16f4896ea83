//! Binary entry point that glues the SQLite-backed repository to the TUI:
//! load (or create) the config, start file logging, load the book list, and
//! drive the Ratatui event loop until the user exits.
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use library_book_manager::logging::{default_log_level, init_logging};
use library_book_manager::{
    data_dir_for, default_config_path, load_or_create, run_app, App, BookController,
    BookListScreen, SqliteBookRepository,
};
use log::info;

/// Returning a `Result` bubbles fatal initialization problems (an unreadable
/// config file, an unwritable data directory) up to the terminal.
fn main() -> anyhow::Result<()> {
    let config_path = match std::env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => default_config_path().context("failed to resolve config location")?,
    };
    let created = !config_path.exists();
    let config = load_or_create(&config_path).context("failed to load configuration")?;
    let data_dir = data_dir_for(&config_path);

    init_logging(&default_log_level(), &data_dir.join("logs")).map_err(|err| anyhow!(err))?;
    info!(
        "event=config_loaded module=main status=ok path={} created={} target={}",
        config_path.display(),
        created,
        config.describe()
    );

    let repo = SqliteBookRepository::new(config, &data_dir);
    let mut controller = BookController::new(repo, BookListScreen::new());
    controller.on_load();

    let mut app = App::new(controller);
    run_app(&mut app)
}
