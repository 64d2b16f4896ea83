//! Domain models that mirror the `books` table and get passed between the
//! repository, the controller, and the TUI. These types stay light-weight data
//! holders; validation of raw form input lives on [`BookFields`] so every
//! caller rejects bad input the same way before storage is touched.

use std::fmt;

use crate::error::ValidationError;

/// Storage-assigned primary key of a book.
pub type BookId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A persisted book row.
pub struct Book {
    /// Primary key assigned by the database on insert. Never chosen by the
    /// client and never changed afterwards.
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.author)
    }
}

/// Validated editable fields of a book, ready to be written by `create` or
/// `update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub publication_year: Option<i32>,
    pub isbn: Option<String>,
}

impl BookDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            publication_year: None,
            isbn: None,
        }
    }

    pub fn published(mut self, year: i32) -> Self {
        self.publication_year = Some(year);
        self
    }

    pub fn isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    /// Attach the storage id once the row exists.
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            publication_year: self.publication_year,
            isbn: self.isbn,
        }
    }
}

/// Raw text captured by the add/edit form before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: String,
    pub isbn: String,
}

impl BookFields {
    /// Pre-fill the form from an existing row when editing.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book
                .publication_year
                .map(|year| year.to_string())
                .unwrap_or_default(),
            isbn: book.isbn.clone().unwrap_or_default(),
        }
    }

    /// Trim every field, require title/author/genre, and parse the optional
    /// year. A blank ISBN is stored as `NULL`.
    pub fn validate(&self) -> Result<BookDraft, ValidationError> {
        let title = self.title.trim();
        let author = self.author.trim();
        let genre = self.genre.trim();
        if title.is_empty() || author.is_empty() || genre.is_empty() {
            return Err(ValidationError::MissingFields);
        }

        let year = self.year.trim();
        let publication_year = if year.is_empty() {
            None
        } else {
            Some(
                year.parse::<i32>()
                    .map_err(|_| ValidationError::InvalidYear(year.to_string()))?,
            )
        };

        let isbn = self.isbn.trim();
        Ok(BookDraft {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            publication_year,
            isbn: (!isbn.is_empty()).then(|| isbn.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, author: &str, genre: &str, year: &str, isbn: &str) -> BookFields {
        BookFields {
            title: title.to_string(),
            author: author.to_string(),
            genre: genre.to_string(),
            year: year.to_string(),
            isbn: isbn.to_string(),
        }
    }

    #[test]
    fn validate_trims_and_parses_optional_values() {
        let draft = fields(" Dune ", "Frank Herbert", "Sci-Fi", " 1965 ", " 9780441013593 ")
            .validate()
            .unwrap();
        assert_eq!(
            draft,
            BookDraft::new("Dune", "Frank Herbert", "Sci-Fi")
                .published(1965)
                .isbn("9780441013593")
        );
    }

    #[test]
    fn validate_maps_blank_optionals_to_none() {
        let draft = fields("Emma", "Jane Austen", "Classic", "", "   ")
            .validate()
            .unwrap();
        assert_eq!(draft.publication_year, None);
        assert_eq!(draft.isbn, None);
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        for input in [
            fields("", "a", "g", "", ""),
            fields("t", "  ", "g", "", ""),
            fields("t", "a", "", "", ""),
        ] {
            assert_eq!(input.validate(), Err(ValidationError::MissingFields));
        }
    }

    #[test]
    fn validate_rejects_non_numeric_year() {
        let err = fields("t", "a", "g", "19x5", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::InvalidYear("19x5".to_string()));
    }

    #[test]
    fn from_book_round_trips_through_validate() {
        let book = BookDraft::new("Dune", "Frank Herbert", "Sci-Fi")
            .published(1965)
            .into_book(7);
        let draft = BookFields::from_book(&book).validate().unwrap();
        assert_eq!(draft.into_book(7), book);
    }
}
