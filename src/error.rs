//! Error taxonomy shared by the repository and the controller.

use thiserror::Error;

use crate::models::BookId;

/// Failures reported by the storage layer. Both variants carry the engine's
/// own message so the UI can surface it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The session could not be established (or was never opened).
    #[error("cannot connect to database: {0}")]
    Connection(String),

    /// A statement failed: malformed SQL, constraint violation, or the
    /// connection dropped mid-operation.
    #[error("{0}")]
    Query(String),
}

/// Attach a short description of the failing step to a driver error, the way
/// `anyhow::Context` does for the binary.
pub(crate) trait QueryContext<T> {
    fn query_context(self, context: &str) -> Result<T, StorageError>;
}

impl<T> QueryContext<T> for Result<T, rusqlite::Error> {
    fn query_context(self, context: &str) -> Result<T, StorageError> {
        self.map_err(|err| StorageError::Query(format!("{context}: {err}")))
    }
}

/// Client-side input problems caught before any storage call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title, Author and Genre are required fields")]
    MissingFields,

    #[error("Publication Year must be a number (got `{0}`)")]
    InvalidYear(String),
}

/// Outcome of a user action that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Book #{0} no longer exists")]
    NotFound(BookId),
}
