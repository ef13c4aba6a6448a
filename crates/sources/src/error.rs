//! Errors raised by the store collaborators.

use catalog::FilmId;
use thiserror::Error;

/// Failure of a single store call.
///
/// Every strategy recovers from these at its stage boundary; only
/// `Unavailable` can end up as an HTTP error, and only when it is seen at
/// every stage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store was reachable but the query failed
    #[error("Query failed: {0}")]
    Query(String),

    /// Lookup by id found no row
    #[error("Film {0} not found")]
    NotFound(FilmId),

    /// The request deadline passed before the call completed
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// The caller went away
    #[error("Request cancelled")]
    Cancelled,
}

impl StoreError {
    /// Whether this failure means the store itself is unreachable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }

    /// Whether the request ran out of time or was abandoned
    pub fn is_interrupted(&self) -> bool {
        matches!(self, StoreError::DeadlineExceeded | StoreError::Cancelled)
    }
}

/// Convenience type alias for store results
pub type StoreResult<T> = std::result::Result<T, StoreError>;
