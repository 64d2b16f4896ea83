use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, BookFields, BookId};

/// Form state for adding or editing a book.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) fields: BookFields,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form, in tab order.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Genre,
    Year,
    Isbn,
}

impl BookField {
    pub(crate) const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Genre,
        BookField::Year,
        BookField::Isbn,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Genre => "Genre",
            BookField::Year => "Publication Year",
            BookField::Isbn => "ISBN",
        }
    }

    fn required(self) -> bool {
        matches!(self, BookField::Title | BookField::Author | BookField::Genre)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl BookForm {
    /// Populate the form from an existing book when editing.
    pub(crate) fn from_book(book: &Book) -> Self {
        Self {
            fields: BookFields::from_book(book),
            ..Self::default()
        }
    }

    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    fn value(&self, field: BookField) -> &String {
        match field {
            BookField::Title => &self.fields.title,
            BookField::Author => &self.fields.author,
            BookField::Genre => &self.fields.genre,
            BookField::Year => &self.fields.year,
            BookField::Isbn => &self.fields.isbn,
        }
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.fields.title,
            BookField::Author => &mut self.fields.author,
            BookField::Genre => &mut self.fields.genre,
            BookField::Year => &mut self.fields.year,
            BookField::Isbn => &mut self.fields.isbn,
        }
    }

    /// Insert a character into the active field. Control characters are
    /// ignored; the year is validated on submit, not per keystroke.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let active = self.active;
        self.value_mut(active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let active = self.active;
        self.value_mut(active).pop();
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.value(field);
        let display = match (value.is_empty(), field.required()) {
            (true, true) => "<required>".to_string(),
            (true, false) => "<optional>".to_string(),
            (false, _) => value.clone(),
        };

        let style = if field == self.active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset and row for the active field.
    pub(crate) fn cursor_offset(&self) -> (u16, u16) {
        let field = self.active;
        let prefix = field.label().len() + 2;
        let column = prefix + self.value(field).chars().count();
        (column as u16, field.index() as u16)
    }
}

/// Pending deletion waiting for a yes/no answer.
#[derive(Clone)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: BookId,
    pub(crate) prompt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_wraps_both_ways() {
        let mut form = BookForm::default();
        form.previous_field();
        assert!(form.active == BookField::Isbn);
        form.next_field();
        assert!(form.active == BookField::Title);
    }

    #[test]
    fn typing_goes_to_active_field() {
        let mut form = BookForm::default();
        for ch in "Dune".chars() {
            form.push_char(ch);
        }
        form.next_field();
        form.next_field();
        form.next_field();
        assert!(form.push_char('1'));
        assert!(!form.push_char('\u{7}'));
        form.backspace();
        form.push_char('9');

        assert_eq!(form.fields.title, "Dune");
        assert_eq!(form.fields.year, "9");
        assert_eq!(form.cursor_offset(), ("Publication Year: 9".len() as u16, 3));
    }
}
