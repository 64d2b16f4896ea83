use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::models::Book;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// `[key] Label   ` pair for the footer.
pub(crate) fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    [
        Span::styled(format!("[{key}]"), key_style),
        Span::raw(format!(" {label}   ")),
    ]
}

/// Cell texts for one table row.
pub(crate) fn book_cells(book: &Book) -> [String; 6] {
    [
        book.id.to_string(),
        book.title.clone(),
        book.author.clone(),
        book.genre.clone(),
        book.publication_year
            .map(|year| year.to_string())
            .unwrap_or_default(),
        book.isbn.clone().unwrap_or_default(),
    ]
}

/// First row index to draw so `selected` stays visible in `capacity` rows.
pub(crate) fn scroll_offset(selected: usize, len: usize, capacity: usize) -> usize {
    let capacity = capacity.max(1);
    let mut start = if selected >= capacity {
        selected + 1 - capacity
    } else {
        0
    };
    if start + capacity > len {
        start = len.saturating_sub(capacity);
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookDraft;

    #[test]
    fn scroll_offset_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10, 4), 0);
        assert_eq!(scroll_offset(3, 10, 4), 0);
        assert_eq!(scroll_offset(4, 10, 4), 1);
        assert_eq!(scroll_offset(9, 10, 4), 6);
        assert_eq!(scroll_offset(2, 3, 10), 0);
    }

    #[test]
    fn book_cells_blank_missing_optionals() {
        let book = BookDraft::new("Emma", "Jane Austen", "Classic").into_book(3);
        assert_eq!(
            book_cells(&book),
            ["3", "Emma", "Jane Austen", "Classic", "", ""].map(String::from)
        );
    }
}
