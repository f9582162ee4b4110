//! Application-wide error types.
//!
//! This module defines the top-level error type returned by application
//! start-up and the UI loop.

pub use crate::backend::BackendError;
pub use crate::config::ConfigError;
pub use crate::export::ExportError;

/// Main application error type.
///
/// Encompasses every module error that can end the application, with
/// automatic conversion through `thiserror`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Case backend errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),

    /// Runtime creation errors
    #[error("Failed to create runtime: {0}")]
    RuntimeCreation(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_error: AppError = ConfigError::FilePathNotSet.into();
        assert!(matches!(app_error, AppError::Config(_)));
        assert!(app_error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_app_error_from_backend_error() {
        let backend_error = BackendError::InvalidBaseUrl("relative URL without a base".to_string());
        let app_error: AppError = backend_error.into();
        assert!(matches!(app_error, AppError::Backend(_)));
        assert!(app_error.to_string().contains("relative URL"));
    }

    #[test]
    fn test_app_error_from_export_error() {
        let app_error: AppError = ExportError::EmptyResult.into();
        assert!(matches!(app_error, AppError::Export(_)));
        assert!(app_error.to_string().contains("No data found"));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
        assert!(app_error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_app_error_terminal() {
        let error = AppError::Terminal("raw mode unavailable".to_string());
        assert!(error.to_string().contains("Terminal error"));
    }
}
