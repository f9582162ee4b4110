//! State management-specific error types.

/// Errors that can occur during state operations.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Network thread is gone
    #[error("Network channel closed: {0}")]
    ChannelClosed(String),
}
