use std::collections::VecDeque;

use ratatui::style::{Color, Style};

use crate::controller::{BookView, Notice};
use crate::models::Book;

/// Footer message text plus its severity.
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    pub(crate) fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Everything the controller pushes to the terminal: the rows of the book
/// table, the cursor inside it, the footer status, and notices waiting to be
/// acknowledged.
#[derive(Default)]
pub struct BookListScreen {
    pub(crate) rows: Vec<Book>,
    pub(crate) selected: usize,
    pub(crate) status: Option<StatusMessage>,
    notices: VecDeque<Notice>,
}

impl BookListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.rows.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() as isize - 1;
        self.selected = (self.selected as isize + offset).clamp(0, last) as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Notice currently shown on top of everything else.
    pub(crate) fn pending_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub(crate) fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub(crate) fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
        });
    }
}

impl BookView for BookListScreen {
    /// Swap in the new rows while keeping the cursor on the same book when it
    /// is still listed.
    fn show_rows(&mut self, rows: &[Book]) {
        let focused = self.current_book().map(|book| book.id);
        self.rows = rows.to_vec();

        if let Some(idx) = focused.and_then(|id| self.rows.iter().position(|b| b.id == id)) {
            self.selected = idx;
        } else if self.selected >= self.rows.len() {
            self.select_last();
        }
    }

    fn show_status(&mut self, status: &str) {
        let kind = if status.starts_with("Error") {
            StatusKind::Error
        } else {
            StatusKind::Info
        };
        self.status = Some(StatusMessage {
            text: status.to_string(),
            kind,
        });
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookDraft;

    fn book(id: i64, title: &str) -> Book {
        BookDraft::new(title, "Author", "Genre").into_book(id)
    }

    #[test]
    fn show_rows_keeps_cursor_on_same_book() {
        let mut screen = BookListScreen::new();
        screen.show_rows(&[book(1, "A"), book(2, "B"), book(3, "C")]);
        screen.move_selection(1);
        assert_eq!(screen.current_book().map(|b| b.id), Some(2));

        screen.show_rows(&[book(4, "0"), book(1, "A"), book(2, "B")]);
        assert_eq!(screen.current_book().map(|b| b.id), Some(2));
    }

    #[test]
    fn show_rows_clamps_cursor_when_book_disappears() {
        let mut screen = BookListScreen::new();
        screen.show_rows(&[book(1, "A"), book(2, "B"), book(3, "C")]);
        screen.select_last();

        screen.show_rows(&[book(1, "A")]);
        assert_eq!(screen.selected, 0);

        screen.show_rows(&[]);
        assert!(screen.current_book().is_none());
    }

    #[test]
    fn notices_queue_in_order() {
        let mut screen = BookListScreen::new();
        screen.notify(Notice::info("Success", "first"));
        screen.notify(Notice::error("Database Error", "second"));

        assert_eq!(screen.pending_notice().unwrap().message, "first");
        screen.dismiss_notice();
        assert_eq!(screen.pending_notice().unwrap().message, "second");
        screen.dismiss_notice();
        assert!(screen.pending_notice().is_none());
    }

    #[test]
    fn error_status_is_flagged() {
        let mut screen = BookListScreen::new();
        screen.show_status("Error loading books");
        assert!(screen.status.as_ref().unwrap().kind == StatusKind::Error);
        screen.show_status("Loaded 3 books");
        assert!(screen.status.as_ref().unwrap().kind == StatusKind::Info);
    }
}
