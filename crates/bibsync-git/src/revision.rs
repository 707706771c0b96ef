//! Locating the three commits a semantic merge needs.

use git2::{ErrorCode, Oid, Repository};

use crate::{Error, Result, tracking_branch};

/// The commits taking part in a three-way merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionTriple {
    /// Nearest common ancestor; `None` for unrelated histories
    pub base: Option<Oid>,
    /// Tip of the local branch (HEAD)
    pub local: Oid,
    /// Tip of the upstream tracking ref
    pub remote: Oid,
}

/// Resolve HEAD, its upstream tracking ref and their merge base.
///
/// The upstream is read from the tracking ref as of the last fetch; callers
/// that need the newest remote state fetch first.
///
/// # Errors
///
/// [`Error::TrackingBranchNotFound`] if HEAD is detached, no upstream is
/// configured, or the upstream ref has not been fetched.
pub fn locate_merge_commits(repo: &Repository) -> Result<RevisionTriple> {
    let tracking = tracking_branch(repo)?;

    let local = repo.head()?.peel_to_commit()?.id();
    let remote = repo
        .refname_to_id(&tracking.upstream_ref)
        .map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::TrackingBranchNotFound {
                branch: tracking.local_ref.clone(),
            },
            _ => Error::Git(e),
        })?;

    let base = match repo.merge_base(local, remote) {
        Ok(oid) => Some(oid),
        Err(e) if e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    tracing::debug!(
        local = %local,
        remote = %remote,
        base = ?base.map(|oid| oid.to_string()),
        "Located merge revisions"
    );

    Ok(RevisionTriple { base, local, remote })
}
