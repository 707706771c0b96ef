//! Error types for bibsync-git

use std::path::PathBuf;

/// Result type for bibsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bibsync-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] bibsync_fs::Error),

    #[error("No git repository found for {path}")]
    RepositoryNotFound { path: PathBuf },

    #[error("Repository at {path} has no work tree")]
    BareRepository { path: PathBuf },

    #[error("No tracking branch configured for '{branch}'")]
    TrackingBranchNotFound { branch: String },

    #[error("Remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("Fetch failed: {message}")]
    FetchFailed { message: String },

    #[error("Push failed: {message}")]
    PushFailed { message: String },

    #[error("Push rejected by remote: {message}")]
    PushRejected { message: String },

    #[error("'{path}' is not a file at commit {commit}")]
    NotAFile { path: String, commit: String },

    #[error("'{path}' at commit {commit} is not valid UTF-8")]
    InvalidUtf8 { path: String, commit: String },

    #[error("Merge has conflicts outside the database file: {}", paths.join(", "))]
    MergeConflict { paths: Vec<String> },
}
