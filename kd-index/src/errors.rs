//! Error types for spatial index operations.

use thiserror::Error;

/// Errors that can occur in spatial index operations.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// An argument was outside its valid range (dimensionality mismatch,
    /// zero capacity, rank outside `[1, N]`, and similar).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested element is not present in the structure.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation requires a non-empty structure.
    #[error("empty structure: {0}")]
    EmptyStructure(String),
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SpatialError::InvalidArgument("k must be at least 1".to_string());
        assert_eq!(err.to_string(), "invalid argument: k must be at least 1");

        let err = SpatialError::NotFound("point is not in the tree".to_string());
        assert_eq!(err.to_string(), "not found: point is not in the tree");

        let err = SpatialError::EmptyStructure("cannot pop min".to_string());
        assert_eq!(err.to_string(), "empty structure: cannot pop min");
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<SpatialError>();
    }
}
