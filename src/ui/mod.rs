//! Ratatui front-end: the terminal collaborator that renders what the
//! controller pushes and turns key presses into controller actions.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, LibraryController};
pub use screens::BookListScreen;
pub use terminal::run_app;
