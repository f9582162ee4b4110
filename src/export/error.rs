//! Export-specific error types.

use crate::backend::BackendError;
use crate::state::export::ExportValidationError;

/// Errors that can occur while producing an export file.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Selection failed validation; nothing was requested
    #[error(transparent)]
    Validation(#[from] ExportValidationError),

    /// Rows could not be fetched
    #[error("Export request failed: {}", .0.detail())]
    Backend(#[from] BackendError),

    /// Backend returned no rows
    #[error("No data found for the selected criteria")]
    EmptyResult,

    /// Encoder rejected the table
    #[error("Failed to encode {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },

    /// Output file could not be written
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),
}
