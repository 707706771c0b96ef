//! Error types for bibsync-model

/// Result type for bibsync-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a database
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unexpected end of input while reading {context}")]
    UnexpectedEof { context: String },
}
