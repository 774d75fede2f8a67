//! Infrastructure error types.
//!
//! Domain validation failures live in [`crate::domain::ValidationError`];
//! this module covers everything around the primitives, such as loading
//! configuration.

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },

    /// Failed to load .env file
    #[error("Failed to load .env file: {0}")]
    DotenvError(String),
}

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::DotenvError("line 3: unexpected character".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to load .env file: line 3: unexpected character"
        );

        let err = ConfigError::InvalidValue {
            var: "VALIDATION_CACHE_MAX_ENTRIES".to_string(),
            reason: "Must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for VALIDATION_CACHE_MAX_ENTRIES: Must be at least 1"
        );
    }
}
