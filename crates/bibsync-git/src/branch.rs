//! Branch and upstream lookups shared by status and revision code.

use git2::{ErrorCode, Repository};

use crate::{Error, Result};

/// The current branch and the remote branch it synchronizes against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingBranch {
    /// Full local ref, e.g. `refs/heads/main`
    pub local_ref: String,
    /// Remote-tracking ref, e.g. `refs/remotes/origin/main`
    pub upstream_ref: String,
    /// Remote name, e.g. `origin`
    pub remote: String,
    /// Ref name on the remote, e.g. `refs/heads/main`
    pub merge_ref: String,
}

/// Resolve the upstream configuration (`branch.<name>.remote` / `.merge`) of HEAD.
///
/// # Errors
///
/// [`Error::TrackingBranchNotFound`] when HEAD is detached or the branch has
/// no upstream.
pub fn tracking_branch(repo: &Repository) -> Result<TrackingBranch> {
    let local_ref = head_ref_name(repo)?;
    let branch = local_ref
        .strip_prefix("refs/heads/")
        .unwrap_or(&local_ref)
        .to_string();
    let not_found = || Error::TrackingBranchNotFound {
        branch: branch.clone(),
    };

    let upstream_ref = lookup(repo.branch_upstream_name(&local_ref))?.ok_or_else(not_found)?;
    let remote = lookup(repo.branch_upstream_remote(&local_ref))?.ok_or_else(not_found)?;
    let merge_ref = lookup(repo.branch_upstream_merge(&local_ref))?.ok_or_else(not_found)?;

    Ok(TrackingBranch {
        local_ref,
        upstream_ref,
        remote,
        merge_ref,
    })
}

/// Full ref name HEAD points at, even when the branch is unborn.
fn head_ref_name(repo: &Repository) -> Result<String> {
    let head = repo.find_reference("HEAD")?;
    match head.symbolic_target() {
        Some(target) => Ok(target.to_string()),
        None => Err(Error::TrackingBranchNotFound {
            branch: "HEAD".to_string(),
        }),
    }
}

/// Map a NotFound config lookup to `None`.
fn lookup(result: std::result::Result<git2::Buf, git2::Error>) -> Result<Option<String>> {
    match result {
        Ok(buf) => Ok(buf.as_str().map(str::to_string)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with_commit(temp_dir: &TempDir) -> (Repository, git2::Oid) {
        let repo = Repository::init(temp_dir.path()).unwrap();
        let sig = git2::Signature::now("Test", "test@test.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let oid = {
            let tree = repo.find_tree(tree_id).unwrap();
            repo.commit(Some("HEAD"), &sig, &sig, "Initial", &tree, &[])
                .unwrap()
        };
        (repo, oid)
    }

    #[test]
    fn test_tracking_branch_missing_without_remote() {
        let temp_dir = TempDir::new().unwrap();
        let (repo, _) = repo_with_commit(&temp_dir);

        let err = tracking_branch(&repo).unwrap_err();
        assert!(matches!(err, Error::TrackingBranchNotFound { .. }));
    }

    #[test]
    fn test_tracking_branch_missing_on_detached_head() {
        let temp_dir = TempDir::new().unwrap();
        let (repo, oid) = repo_with_commit(&temp_dir);
        repo.set_head_detached(oid).unwrap();

        let err = tracking_branch(&repo).unwrap_err();
        assert!(matches!(err, Error::TrackingBranchNotFound { branch } if branch == "HEAD"));
    }
}
