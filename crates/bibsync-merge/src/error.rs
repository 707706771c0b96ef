//! Error types for bibsync-merge

use std::path::PathBuf;

/// Result type for bibsync-merge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while writing a merge result
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(bibsync_fs::Error),

    #[error("{path} is not inside the work tree {work_tree}")]
    PathOutsideWorkTree { path: PathBuf, work_tree: PathBuf },
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
