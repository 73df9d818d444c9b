//! Error types for footprint operations.
//!
//! This module defines [`FootprintError`], the primary error type used
//! throughout the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `FootprintError` for domain-specific errors that need distinct handling
//! - Update failures carry their own [`UpdateError`] and convert via `?`
//! - Use `anyhow::Error` (via `FootprintError::Other`) for unexpected errors
//! - All errors should provide actionable messages for users

use std::path::PathBuf;
use thiserror::Error;

use crate::updates::UpdateError;

/// Core error type for footprint operations.
#[derive(Debug, Error)]
pub enum FootprintError {
    /// Failed to parse the configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Self-update failed.
    #[error(transparent)]
    Update(#[from] UpdateError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for footprint operations.
pub type Result<T> = std::result::Result<T, FootprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = FootprintError::ConfigParseError {
            path: PathBuf::from("/home/me/.footprint/config.yml"),
            message: "invalid type".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/home/me/.footprint/config.yml"));
        assert!(msg.contains("invalid type"));
    }

    #[test]
    fn config_validation_error_displays_message() {
        let err = FootprintError::ConfigValidationError {
            message: "bad value".into(),
        };
        assert!(err.to_string().contains("bad value"));
    }

    #[test]
    fn update_error_is_transparent() {
        let err: FootprintError = UpdateError::MissingVersion.into();
        assert_eq!(err.to_string(), UpdateError::MissingVersion.to_string());
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FootprintError = io_err.into();
        assert!(matches!(err, FootprintError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(FootprintError::ConfigValidationError {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
