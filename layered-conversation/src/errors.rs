//! Error types for the conversation model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversationError {
    /// Error parsing a serialized conversation.
    #[error("failed to parse conversation: {message}")]
    Parse { message: String },

    /// Error reading a conversation file.
    #[error("failed to load conversation: {path}: {message}")]
    Load { path: String, message: String },
}

/// Result type for conversation operations.
pub type ConversationResult<T> = Result<T, ConversationError>;
