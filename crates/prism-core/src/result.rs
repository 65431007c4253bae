//! Result type alias for analysis and rewrite operations

use crate::error::PrismError;

/// Standard Result type for analysis and rewrite operations
pub type Result<T> = std::result::Result<T, PrismError>;

/// Extension trait for Result to provide additional convenience methods
pub trait ResultExt<T> {
    /// Absorb a recoverable error as `None`, logging it; anything fatal
    /// (cancellation, IO, internal) stays an error.
    fn recoverable(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Recoverable error: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
