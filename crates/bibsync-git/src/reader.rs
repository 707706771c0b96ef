//! Reading file content as of a historical commit.

use std::path::Path;

use git2::{ErrorCode, ObjectType, Oid, Repository};

use bibsync_fs::NormalizedPath;

use crate::{Error, Result};

/// Read `path` (relative to the work-tree root) from the tree of `commit`.
///
/// Returns `Ok(None)` when the path does not exist at that commit.
///
/// # Errors
///
/// [`Error::NotAFile`] when the path names a directory or submodule and
/// [`Error::InvalidUtf8`] when the blob is not text.
pub fn read_file_from_commit(
    repo: &Repository,
    commit: Oid,
    path: &NormalizedPath,
) -> Result<Option<String>> {
    let tree = repo.find_commit(commit)?.tree()?;

    let entry = match tree.get_path(Path::new(path.as_str())) {
        Ok(entry) => entry,
        Err(e) if e.code() == ErrorCode::NotFound => {
            tracing::debug!(path = %path, commit = %commit, "File absent at commit");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    if entry.kind() != Some(ObjectType::Blob) {
        return Err(Error::NotAFile {
            path: path.to_string(),
            commit: commit.to_string(),
        });
    }

    let blob = repo.find_blob(entry.id())?;
    let text = std::str::from_utf8(blob.content()).map_err(|_| Error::InvalidUtf8 {
        path: path.to_string(),
        commit: commit.to_string(),
    })?;

    Ok(Some(text.to_string()))
}
