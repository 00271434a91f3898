//! Error types for Ashkettle.

use crate::ids::EntityId;
use thiserror::Error;

/// Top-level error type for Ashkettle operations.
#[derive(Debug, Error)]
pub enum AshkettleError {
    /// Configuration parse/validation errors
    #[error("Config error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Referenced entity does not exist
    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    /// Simulation invariant was violated by a caller
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type alias for Ashkettle operations.
pub type AshkettleResult<T> = Result<T, AshkettleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AshkettleError::EntityNotFound(EntityId::from_raw(3));
        assert!(err.to_string().contains("Entity not found"));
    }
}
