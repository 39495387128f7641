use thiserror::Error;

use crate::core::db::model::Point;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by [`StreetStore`](super::StreetStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("street not found: {id}")]
    NotFound { id: i64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The underlying persistence operation failed. Never retried.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("failed to apply schema migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Input rejected before any statement reaches the database.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("street name must not be blank")]
    BlankName,

    #[error("street name must not contain NUL characters")]
    NulInName,

    #[error("street name is {length} characters long, at most {max} are allowed")]
    NameTooLong { length: usize, max: usize },

    #[error("coordinate {point} is not a finite number")]
    NonFiniteCoordinate { point: Point },
}
