//! Error types for bibsync-cli

use bibsync_core::AbortReason;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from bibsync-core
    #[error(transparent)]
    Core(#[from] bibsync_core::Error),

    /// Error from bibsync-git
    #[error(transparent)]
    Git(#[from] bibsync_git::Error),

    /// Terminal prompt error
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A pull or push stopped before changing anything
    #[error("{operation} aborted: {reason}")]
    Aborted {
        operation: &'static str,
        reason: AbortReason,
    },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for aborted operations, 1 for failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Aborted { .. } => 2,
            _ => 1,
        }
    }
}
