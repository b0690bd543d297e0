//! Convenience result type alias for the worker harness.

use crate::error::AppError;

/// A specialized `Result` type for harness operations.
///
/// Hook callbacks return this so that every plugin reports failures through
/// the same [`AppError`] type.
pub type AppResult<T> = Result<T, AppError>;
