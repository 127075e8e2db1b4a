//! Application result type

use crate::utils::AppError;

/// Result type used by all handlers and services
pub type AppResult<T> = Result<T, AppError>;
