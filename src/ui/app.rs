use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::debug;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::controller::{delete_prompt, BookController, NoticeKind};
use crate::models::BookId;
use crate::repository::SqliteBookRepository;

use super::forms::{BookField, BookForm, ConfirmBookDelete};
use super::helpers::{book_cells, centered_rect, key_hint, scroll_offset};
use super::screens::BookListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Search bar height above the table.
const SEARCH_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;
const COLUMN_TITLES: [&str; 6] = ["ID", "Title", "Author", "Genre", "Year", "ISBN"];

/// Controller wired to SQLite and the terminal screen.
pub type LibraryController = BookController<SqliteBookRepository, BookListScreen>;

/// Fine-grained input modes. Notices are not a mode: while one is pending it
/// captures the next key regardless of mode.
enum Mode {
    Normal,
    Searching(String),
    Adding(BookForm),
    Editing { id: BookId, form: BookForm },
    ConfirmDelete(ConfirmBookDelete),
}

/// Central application state for the TUI.
pub struct App {
    controller: LibraryController,
    mode: Mode,
}

impl App {
    pub fn new(controller: LibraryController) -> Self {
        Self {
            controller,
            mode: Mode::Normal,
        }
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.screen().pending_notice().is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.screen_mut().dismiss_notice();
            }
            return Ok(false);
        }

        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching(query) => self.handle_search(code, query),
            Mode::Adding(form) => self.handle_add(code, form),
            Mode::Editing { id, form } => self.handle_edit(code, id, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Up => self.screen_mut().move_selection(-1),
            KeyCode::Down => self.screen_mut().move_selection(1),
            KeyCode::PageUp => self.screen_mut().move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.screen_mut().move_selection(PAGE_STEP),
            KeyCode::Home => self.screen_mut().select_first(),
            KeyCode::End => self.screen_mut().select_last(),
            KeyCode::Char('/') | KeyCode::Char('f') => {
                return Mode::Searching(self.controller.search_text().to_string());
            }
            KeyCode::Char('c') => self.controller.on_clear_search(),
            KeyCode::Char('r') => {
                let text = self.controller.search_text().to_string();
                self.controller.on_search_text_changed(&text);
            }
            KeyCode::Char('a') | KeyCode::Char('+') => return Mode::Adding(BookForm::default()),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(book) = self.screen().current_book() {
                    return Mode::Editing {
                        id: book.id,
                        form: BookForm::from_book(book),
                    };
                }
                self.controller.on_no_selection("edit");
            }
            KeyCode::Char('d') | KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(book) = self.screen().current_book() {
                    return Mode::ConfirmDelete(ConfirmBookDelete {
                        id: book.id,
                        prompt: delete_prompt(book),
                    });
                }
                self.controller.on_no_selection("delete");
            }
            _ => {}
        }
        Mode::Normal
    }

    /// Every edit of the query re-runs the search immediately.
    fn handle_search(&mut self, code: KeyCode, mut query: String) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => {
                self.screen_mut().move_selection(-1);
                return Mode::Searching(query);
            }
            KeyCode::Down => {
                self.screen_mut().move_selection(1);
                return Mode::Searching(query);
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => query.push(ch),
            _ => return Mode::Searching(query),
        }

        self.controller.on_search_text_changed(&query);
        Mode::Searching(query)
    }

    fn handle_add(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.screen_mut().set_info("Add book cancelled.");
                return Mode::Normal;
            }
            KeyCode::Enter => match self.controller.on_create(&form.fields) {
                Ok(_) => return Mode::Normal,
                Err(err) => form.error = Some(err.to_string()),
            },
            code => edit_form(&mut form, code),
        }
        Mode::Adding(form)
    }

    fn handle_edit(&mut self, code: KeyCode, id: BookId, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.screen_mut().set_info("Edit cancelled.");
                return Mode::Normal;
            }
            KeyCode::Enter => match self.controller.on_update(id, &form.fields) {
                Ok(()) => return Mode::Normal,
                Err(err) => form.error = Some(err.to_string()),
            },
            code => edit_form(&mut form, code),
        }
        Mode::Editing { id, form }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.screen_mut().set_info("Deletion cancelled.");
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                // The dialog itself is the confirmation step. Failures already
                // reached the user as a notice.
                if let Err(err) = self.controller.on_delete(confirm.id, |_| true) {
                    debug!(
                        "event=delete module=ui status=error book_id={} error={err}",
                        confirm.id
                    );
                }
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn screen(&self) -> &BookListScreen {
        self.controller.view()
    }

    fn screen_mut(&mut self) -> &mut BookListScreen {
        self.controller.view_mut()
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SEARCH_HEIGHT.min(area.height)),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT.min(area.height)),
            ])
            .split(area);

        self.draw_search_bar(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Adding(form) => self.draw_form(frame, area, "Add New Book", form),
            Mode::Editing { form, .. } => self.draw_form(frame, area, "Edit Book", form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal | Mode::Searching(_) => {}
        }

        self.draw_notice(frame, area);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let (query, active) = match &self.mode {
            Mode::Searching(query) => (query.as_str(), true),
            _ => (self.controller.search_text(), false),
        };
        let border_style = if active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {query}"))).block(block.clone());
        frame.render_widget(paragraph, area);

        if active {
            let inner = block.inner(area);
            let cursor_x = inner.x + "Search: ".len() as u16 + query.chars().count() as u16;
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let screen = self.screen();
        let header = Row::new(COLUMN_TITLES.map(Cell::from)).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

        let rows = screen.rows.iter().enumerate().map(|(idx, book)| {
            let style = if idx % 2 == 0 {
                Style::default()
            } else {
                Style::default().fg(Color::Gray)
            };
            Row::new(book_cells(book).map(Cell::from)).style(style)
        });

        let widths = [
            Constraint::Length(6),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Length(6),
            Constraint::Min(13),
        ];

        let block = Block::default().borders(Borders::ALL).title("Books");
        // Header and borders take three lines.
        let capacity = area.height.saturating_sub(3) as usize;
        let mut state = TableState::default()
            .with_offset(scroll_offset(screen.selected, screen.rows.len(), capacity))
            .with_selected((!screen.rows.is_empty()).then_some(screen.selected));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = match &self.screen().status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.kind.style())),
            None => Line::from(""),
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hints: Vec<[Span<'static>; 2]> = match &self.mode {
            Mode::Searching(_) => vec![
                key_hint("type", "Filter"),
                key_hint("↑↓", "Navigate"),
                key_hint("Enter/Esc", "Done"),
            ],
            Mode::Adding(_) | Mode::Editing { .. } => vec![
                key_hint("Tab", "Next Field"),
                key_hint("Enter", "Save"),
                key_hint("Esc", "Cancel"),
            ],
            Mode::ConfirmDelete(_) => vec![key_hint("Y", "Delete"), key_hint("N/Esc", "Keep")],
            Mode::Normal => vec![
                key_hint("↑↓", "Navigate"),
                key_hint("/", "Search"),
                key_hint("a", "Add"),
                key_hint("e", "Edit"),
                key_hint("d", "Delete"),
                key_hint("c", "Clear"),
                key_hint("r", "Reload"),
                key_hint("q", "Quit"),
            ],
        };
        Line::from(hints.into_iter().flatten().collect::<Vec<_>>())
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        if self.screen().pending_notice().is_none() {
            let (column, row) = form.cursor_offset();
            frame.set_cursor_position((inner.x + column, inner.y + row));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(confirm.prompt.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect) {
        let Some(notice) = self.screen().pending_notice() else {
            return;
        };
        let popup_area = centered_rect(60, 25, area);
        frame.render_widget(Clear, popup_area);

        let border_style = match notice.kind {
            NoticeKind::Info => Style::default().fg(Color::Green),
            NoticeKind::Error => Style::default().fg(Color::Red),
        };
        let block = Block::default()
            .title(notice.title.clone())
            .borders(Borders::ALL)
            .border_style(border_style);

        let lines = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Shared keystroke handling for the add and edit dialogs.
fn edit_form(form: &mut BookForm, code: KeyCode) {
    match code {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.previous_field(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(ch) => {
            if form.push_char(ch) {
                form.error = None;
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::BookDraft;
    use crate::repository::BookRepository;
    use tempfile::TempDir;

    fn app_with(titles: &[&str]) -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let mut repo = SqliteBookRepository::new(DatabaseConfig::default(), dir.path());
        repo.connect().unwrap();
        for title in titles {
            repo.create(&BookDraft::new(*title, "Someone", "Misc")).unwrap();
        }
        repo.disconnect();

        let mut controller = BookController::new(repo, BookListScreen::new());
        controller.on_load();
        (dir, App::new(controller))
    }

    #[test]
    fn esc_in_normal_mode_does_not_quit() {
        let (_dir, mut app) = app_with(&["Dune"]);

        assert!(!app.handle_key(KeyCode::Char('/')).unwrap());
        assert!(!app.handle_key(KeyCode::Esc).unwrap());
        assert!(!app.handle_key(KeyCode::Esc).unwrap());
        assert!(matches!(app.mode, Mode::Normal));

        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn failed_delete_returns_to_normal_with_notice() {
        let (dir, mut app) = app_with(&["Dune"]);
        assert!(!app.handle_key(KeyCode::Char('d')).unwrap());
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));

        let mut other = SqliteBookRepository::new(DatabaseConfig::default(), dir.path());
        other.connect().unwrap();
        assert!(other.delete(1).unwrap());
        other.disconnect();

        assert!(!app.handle_key(KeyCode::Char('y')).unwrap());
        assert!(matches!(app.mode, Mode::Normal));
        let notice = app.screen().pending_notice().unwrap();
        assert_eq!(notice.message, "Book #1 no longer exists");
        assert!(app.screen().rows.is_empty());
    }
}
