//! Convenience result type alias for Nimbus.

use crate::error::AppError;

/// A specialized `Result` type for Nimbus operations.
///
/// Every gateway call, state transition that can fail, and service
/// operation returns this type so callers can use `?` uniformly.
pub type AppResult<T> = Result<T, AppError>;
