//! Convenience result type alias for FileCards.

use crate::error::AppError;

/// A specialized `Result` type for FileCards operations.
pub type AppResult<T> = Result<T, AppError>;
