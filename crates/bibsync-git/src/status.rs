//! Repository status classification for a single database file.

use std::fmt;
use std::path::Path;

use git2::{ErrorCode, Repository, Status, StatusOptions};
use serde::Serialize;

use bibsync_fs::WorkTreeFile;

use crate::{Error, Result, tracking_branch};

/// Relationship between the local branch and its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    UpToDate,
    Ahead,
    Behind,
    Diverged,
    Conflict,
    Untracked,
    Unknown,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UpToDate => "up to date",
            Self::Ahead => "ahead",
            Self::Behind => "behind",
            Self::Diverged => "diverged",
            Self::Conflict => "conflict",
            Self::Untracked => "untracked",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// Point-in-time view of a file's repository state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// The file lives in a repository and git tracks it
    pub tracking: bool,
    /// Tracked content differs from HEAD in the index or work tree
    pub uncommitted_changes: bool,
    /// The index holds unresolved conflict entries
    pub conflict: bool,
    pub sync_status: SyncStatus,
    /// Local HEAD commit, if any
    pub head: Option<String>,
}

impl StatusSnapshot {
    /// Snapshot for a file git does not know about.
    pub fn untracked() -> Self {
        Self {
            tracking: false,
            uncommitted_changes: false,
            conflict: false,
            sync_status: SyncStatus::Untracked,
            head: None,
        }
    }

    /// Snapshot for a tracked file whose state could not be inspected.
    pub fn unknown() -> Self {
        Self {
            tracking: true,
            uncommitted_changes: false,
            conflict: false,
            sync_status: SyncStatus::Unknown,
            head: None,
        }
    }
}

/// Classify the repository state of `path`.
///
/// Never fails: a path outside any repository (or one git does not track)
/// is [`SyncStatus::Untracked`], and any error while inspecting a repository
/// that was found yields [`SyncStatus::Unknown`].
pub fn check_status(path: &Path) -> StatusSnapshot {
    let start = match path.parent() {
        Some(parent) if !path.is_dir() && !parent.as_os_str().is_empty() => parent,
        Some(_) if !path.is_dir() => Path::new("."),
        _ => path,
    };

    let repo = match Repository::discover(start) {
        Ok(repo) => repo,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "No enclosing repository");
            return StatusSnapshot::untracked();
        }
    };

    match inspect(&repo, path) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not determine git status");
            StatusSnapshot::unknown()
        }
    }
}

fn inspect(repo: &Repository, path: &Path) -> Result<StatusSnapshot> {
    let Some(work_tree) = repo.workdir() else {
        return Ok(StatusSnapshot::untracked());
    };
    let file = match WorkTreeFile::resolve(work_tree, path) {
        Ok(file) => file,
        Err(bibsync_fs::Error::OutsideWorkTree { .. }) => return Ok(StatusSnapshot::untracked()),
        Err(e) => return Err(e.into()),
    };

    if !is_tracked(repo, Path::new(file.relative().as_str()))? {
        return Ok(StatusSnapshot::untracked());
    }

    let conflict = repo.index()?.has_conflicts();
    let uncommitted_changes = has_tracked_changes(repo)?;
    let head = head_commit(repo)?;

    let sync_status = if conflict {
        SyncStatus::Conflict
    } else {
        classify(repo, head)?
    };

    Ok(StatusSnapshot {
        tracking: true,
        uncommitted_changes,
        conflict,
        sync_status,
        head: head.map(|oid| oid.to_string()),
    })
}

fn is_tracked(repo: &Repository, relative: &Path) -> Result<bool> {
    match repo.status_file(relative) {
        Ok(status) => Ok(!status.intersects(Status::WT_NEW | Status::IGNORED)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn has_tracked_changes(repo: &Repository) -> Result<bool> {
    let mut options = StatusOptions::new();
    options
        .include_untracked(false)
        .include_ignored(false)
        .exclude_submodules(true);

    let statuses = repo.statuses(Some(&mut options))?;
    Ok(statuses
        .iter()
        .any(|entry| entry.status() != Status::CURRENT))
}

fn head_commit(repo: &Repository) -> Result<Option<git2::Oid>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn classify(repo: &Repository, head: Option<git2::Oid>) -> Result<SyncStatus> {
    let Some(local) = head else {
        return Ok(SyncStatus::Unknown);
    };

    let upstream = match tracking_branch(repo) {
        Ok(tracking) => tracking.upstream_ref,
        Err(Error::TrackingBranchNotFound { branch }) => {
            tracing::debug!(branch = %branch, "No upstream configured");
            return Ok(SyncStatus::Unknown);
        }
        Err(e) => return Err(e),
    };
    let remote = match repo.refname_to_id(&upstream) {
        Ok(oid) => oid,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(SyncStatus::Unknown),
        Err(e) => return Err(e.into()),
    };

    if local == remote {
        return Ok(SyncStatus::UpToDate);
    }

    let base = match repo.merge_base(local, remote) {
        Ok(base) => base,
        Err(e) if e.code() == ErrorCode::NotFound => return Ok(SyncStatus::Diverged),
        Err(e) => return Err(e.into()),
    };

    Ok(if base == remote {
        SyncStatus::Ahead
    } else if base == local {
        SyncStatus::Behind
    } else {
        SyncStatus::Diverged
    })
}
