//! Table session error types

use thiserror::Error;

/// Errors raised by [`super::TableManager`]
///
/// All operations are side-effect free on failure: a rejected occupy or
/// merge leaves every session exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Table already occupied: {0}")]
    AlreadyOccupied(String),

    #[error("Table has no open session: {0}")]
    NotOccupied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
