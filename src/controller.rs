//! View-sync controller between user actions and the book repository.
//!
//! Every action is one blocking request/response: open a [`Session`], issue a
//! single repository call, drop the session, then push the resulting rows,
//! status line, and any notice to the [`BookView`].

use log::{info, warn};

use crate::error::{ActionError, StorageError};
use crate::models::{Book, BookDraft, BookFields, BookId};
use crate::repository::{BookRepository, Session};

/// Severity of a modal notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A blocking message the view shows until the user dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Whatever renders the book list.
pub trait BookView {
    /// Replace the displayed rows, keeping their order.
    fn show_rows(&mut self, rows: &[Book]);
    /// Replace the status line.
    fn show_status(&mut self, status: &str);
    /// Surface a modal notice.
    fn notify(&mut self, notice: Notice);
}

/// Prompt shown before deleting a row.
pub fn delete_prompt(book: &Book) -> String {
    format!("Are you sure you want to delete '{}'?", book.title)
}

pub struct BookController<R: BookRepository, V: BookView> {
    repo: R,
    view: V,
    rows: Vec<Book>,
    search_text: String,
    status: String,
}

impl<R: BookRepository, V: BookView> BookController<R, V> {
    pub fn new(repo: R, view: V) -> Self {
        Self {
            repo,
            view,
            rows: Vec::new(),
            search_text: String::new(),
            status: String::new(),
        }
    }

    pub fn rows(&self) -> &[Book] {
        &self.rows
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Find a displayed row by id.
    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.rows.iter().find(|book| book.id == id)
    }

    /// Reload every book.
    pub fn on_load(&mut self) {
        match self.with_session(|repo| repo.list_all()) {
            Ok(books) => {
                let status = if books.is_empty() {
                    "No books found in database".to_string()
                } else {
                    format!("Loaded {} books", books.len())
                };
                self.replace_rows(books);
                self.set_status(status);
            }
            Err(err) => {
                warn!("event=load module=controller status=error error={err}");
                self.replace_rows(Vec::new());
                self.set_status("Error loading books");
                self.view.notify(Notice::error(
                    "Database Error",
                    format!("Error loading books: {err}"),
                ));
            }
        }
    }

    /// Re-query on every change of the search box. Blank text lists
    /// everything.
    pub fn on_search_text_changed(&mut self, text: &str) {
        self.search_text = text.to_string();
        let term = text.trim();
        if term.is_empty() {
            self.on_load();
            return;
        }

        match self.with_session(|repo| repo.search(term)) {
            Ok(books) => {
                let status = if books.is_empty() {
                    format!("No books found matching '{term}'")
                } else {
                    format!("Found {} books matching '{term}'", books.len())
                };
                self.replace_rows(books);
                self.set_status(status);
            }
            Err(err) => {
                warn!("event=search module=controller status=error error={err}");
                self.replace_rows(Vec::new());
                self.set_status("Error searching for books");
                self.view.notify(Notice::error(
                    "Database Error",
                    format!("Error searching for books: {err}"),
                ));
            }
        }
    }

    /// Empty the search box and show every book again.
    pub fn on_clear_search(&mut self) {
        self.search_text.clear();
        self.on_load();
    }

    /// Validate and insert a new book, then reload the full list.
    pub fn on_create(&mut self, fields: &BookFields) -> Result<BookId, ActionError> {
        let draft = self.validate(fields)?;

        match self.with_session(|repo| repo.create(&draft)) {
            Ok(id) => {
                info!("event=create module=controller status=ok book_id={id}");
                self.view
                    .notify(Notice::info("Success", "Book added successfully"));
                self.on_load();
                Ok(id)
            }
            Err(err) => Err(self.storage_failure("Error adding book", err)),
        }
    }

    /// Validate and replace the fields of `id`, then reload the full list.
    pub fn on_update(&mut self, id: BookId, fields: &BookFields) -> Result<(), ActionError> {
        let draft = self.validate(fields)?;

        match self.with_session(|repo| repo.update(id, &draft)) {
            Ok(true) => {
                info!("event=update module=controller status=ok book_id={id}");
                self.view
                    .notify(Notice::info("Success", "Book updated successfully"));
                self.on_load();
                Ok(())
            }
            Ok(false) => {
                let err = ActionError::NotFound(id);
                self.view
                    .notify(Notice::error("Database Error", err.to_string()));
                self.on_load();
                Err(err)
            }
            Err(err) => Err(self.storage_failure("Error updating book", err)),
        }
    }

    /// Delete a displayed row after `confirm` agrees. Returns `Ok(false)` when
    /// the user declined. The row is dropped from the list without a reload.
    pub fn on_delete<F>(&mut self, id: BookId, confirm: F) -> Result<bool, ActionError>
    where
        F: FnOnce(&str) -> bool,
    {
        let Some(book) = self.book(id).cloned() else {
            self.on_no_selection("delete");
            return Err(ActionError::NotFound(id));
        };
        if !confirm(&delete_prompt(&book)) {
            return Ok(false);
        }

        match self.with_session(|repo| repo.delete(id)) {
            Ok(true) => {
                info!("event=delete module=controller status=ok book_id={id}");
                self.rows.retain(|book| book.id != id);
                self.view.show_rows(&self.rows);
                self.set_status(format!("Book '{}' deleted", book.title));
                Ok(true)
            }
            Ok(false) => {
                let err = ActionError::NotFound(id);
                self.view
                    .notify(Notice::error("Database Error", err.to_string()));
                self.on_load();
                Err(err)
            }
            Err(err) => Err(self.storage_failure("Error deleting book", err)),
        }
    }

    /// Tell the user an action needs a selected row first.
    pub fn on_no_selection(&mut self, action: &str) {
        self.view.notify(Notice::info(
            "No Selection",
            format!("Please select a book to {action}"),
        ));
    }

    fn validate(&mut self, fields: &BookFields) -> Result<BookDraft, ActionError> {
        fields.validate().map_err(|err| {
            self.view.notify(Notice::error("Input Error", err.to_string()));
            ActionError::Validation(err)
        })
    }

    fn storage_failure(&mut self, what: &str, err: StorageError) -> ActionError {
        warn!("event=write module=controller status=error error={err}");
        self.view
            .notify(Notice::error("Database Error", format!("{what}: {err}")));
        ActionError::Storage(err)
    }

    fn with_session<T>(
        &mut self,
        op: impl FnOnce(&mut R) -> Result<T, StorageError>,
    ) -> Result<T, StorageError> {
        let mut session = Session::open(&mut self.repo)?;
        op(&mut *session)
    }

    fn replace_rows(&mut self, rows: Vec<Book>) {
        self.rows = rows;
        self.view.show_rows(&self.rows);
    }

    fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.view.show_status(&self.status);
    }
}
