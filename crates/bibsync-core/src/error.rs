//! Error types for bibsync-core

use std::path::PathBuf;

/// Result type for bibsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bibsync-core operations
///
/// Precondition failures are not errors; they are reported as
/// [`AbortReason`](crate::AbortReason)s.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database file does not live inside the repository work tree
    #[error("{path} is not inside the work tree {work_tree}")]
    PathOutsideWorkTree { path: PathBuf, work_tree: PathBuf },

    /// Filesystem error from bibsync-fs
    #[error(transparent)]
    Fs(bibsync_fs::Error),

    /// Git error from bibsync-git
    #[error(transparent)]
    Git(#[from] bibsync_git::Error),

    /// Parse error from bibsync-model
    #[error(transparent)]
    Model(#[from] bibsync_model::Error),

    /// Write error from bibsync-merge
    #[error(transparent)]
    Merge(bibsync_merge::Error),
}

impl From<bibsync_fs::Error> for Error {
    fn from(err: bibsync_fs::Error) -> Self {
        match err {
            bibsync_fs::Error::OutsideWorkTree { path, work_tree } => {
                Self::PathOutsideWorkTree { path, work_tree }
            }
            other => Self::Fs(other),
        }
    }
}

impl From<bibsync_merge::Error> for Error {
    fn from(err: bibsync_merge::Error) -> Self {
        match err {
            bibsync_merge::Error::PathOutsideWorkTree { path, work_tree } => {
                Self::PathOutsideWorkTree { path, work_tree }
            }
            other => Self::Merge(other),
        }
    }
}
