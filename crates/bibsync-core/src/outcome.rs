//! Results of pull and push

use std::fmt;

use bibsync_git::{Oid, SyncStatus};

/// Why an operation stopped without changing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    NotTracked,
    UnresolvedConflict,
    UncommittedChanges,
    BehindRemote,
    ResolutionCancelled,
    ResolutionIncomplete,
    MergeFailed,
    UnsupportedStatus(SyncStatus),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotTracked => f.write_str("the file is not under git version control"),
            Self::UnresolvedConflict => {
                f.write_str("the repository has unresolved merge conflicts")
            }
            Self::UncommittedChanges => f.write_str("local changes have not been committed"),
            Self::BehindRemote => f.write_str("the local branch is behind its upstream; pull first"),
            Self::ResolutionCancelled => f.write_str("conflict resolution was cancelled"),
            Self::ResolutionIncomplete => {
                f.write_str("conflict resolution did not cover every conflicting record")
            }
            Self::MergeFailed => f.write_str("the semantic merge failed"),
            Self::UnsupportedStatus(status) => write!(f, "cannot sync while status is {status}"),
        }
    }
}

/// Result of [`GitSyncService::fetch_and_merge`](crate::GitSyncService::fetch_and_merge).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// Nothing to pull; the repository was not touched
    UpToDate,
    /// Upstream changes were merged and recorded in `commit`
    Merged { commit: Oid },
    Aborted(AbortReason),
}

impl PullOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Aborted(_))
    }
}

/// Result of [`GitSyncService::push`](crate::GitSyncService::push).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The branch was pushed; `committed` when bibsync created a commit first
    Pushed { committed: bool },
    /// No local commits and no changes to commit
    NothingToPush,
    Aborted(AbortReason),
}

impl PushOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Aborted(_))
    }
}
