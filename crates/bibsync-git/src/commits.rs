//! History of the database file.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{DiffOptions, Repository, Sort};
use serde::Serialize;

use bibsync_fs::NormalizedPath;

use crate::Result;

/// Information about a single commit.
#[derive(Debug, Clone, Serialize)]
pub struct CommitInfo {
    /// Short commit hash (7 characters)
    pub hash: String,

    /// First line of the commit message
    pub message: String,

    /// Commit author name
    pub author: String,

    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

/// List up to `max_count` commits reachable from HEAD that touched `path`.
///
/// Returns commits in reverse-chronological order (most recent first). A
/// commit touches the file when its tree entry differs from every parent's
/// (or, for a root commit, when the file exists).
pub fn list_file_history(
    repo: &Repository,
    path: &NormalizedPath,
    max_count: usize,
) -> Result<Vec<CommitInfo>> {
    let mut revwalk = repo.revwalk()?;
    revwalk.push_head()?;
    revwalk.set_sorting(Sort::TIME)?;

    let mut commits = Vec::with_capacity(max_count);

    for oid_result in revwalk {
        if commits.len() == max_count {
            break;
        }
        let oid = oid_result?;
        let commit = repo.find_commit(oid)?;

        if !touches(repo, &commit, path)? {
            continue;
        }

        let timestamp = commit.time();
        let dt: DateTime<Utc> = Utc
            .timestamp_opt(timestamp.seconds(), 0)
            .single()
            .unwrap_or_default();

        let message = commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string();

        let author = commit.author();
        let author_name = author.name().unwrap_or("Unknown").to_string();

        commits.push(CommitInfo {
            hash: format!("{:.7}", oid),
            message,
            author: author_name,
            timestamp: dt,
        });
    }

    Ok(commits)
}

fn touches(repo: &Repository, commit: &git2::Commit<'_>, path: &NormalizedPath) -> Result<bool> {
    let tree = commit.tree()?;
    let file = Path::new(path.as_str());

    if commit.parent_count() == 0 {
        return Ok(tree.get_path(file).is_ok());
    }

    let mut options = DiffOptions::new();
    options.pathspec(path.as_str());

    for parent in commit.parents() {
        let parent_tree = parent.tree()?;
        let diff = repo.diff_tree_to_tree(Some(&parent_tree), Some(&tree), Some(&mut options))?;
        if diff.deltas().len() == 0 {
            return Ok(false);
        }
    }
    Ok(true)
}
