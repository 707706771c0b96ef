//! The repository collaborator used by the sync service.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use git2::{
    ErrorCode, FetchOptions, IndexEntry, IndexTime, Oid, PushOptions,
    Repository, Signature, build::CheckoutBuilder,
};
use serde::{Deserialize, Serialize};

use bibsync_fs::NormalizedPath;

use crate::credentials::{is_non_fast_forward, remote_callbacks};
use crate::{Error, Result, tracking_branch};

/// Mutating git operations needed to synchronize a database file.
///
/// Every call opens its own repository handle; nothing is cached between calls.
pub trait VersionControl {
    /// Root of the work tree
    fn work_tree(&self) -> &Path;

    /// Open a fresh handle on the repository
    fn open(&self) -> Result<Repository>;

    /// Fetch the upstream of the current branch, updating its tracking ref
    fn fetch_current_branch(&self) -> Result<()>;

    /// Commit all changes to tracked files.
    ///
    /// Returns `false` when there was nothing to commit. With `amend` the
    /// HEAD commit is rewritten instead of extended.
    fn create_commit(&self, message: &str, amend: bool) -> Result<bool>;

    /// Record a merge of `remote` into HEAD.
    ///
    /// The resulting tree is git's merge of both commits with `file` taken
    /// from the work tree. Other paths must merge cleanly.
    fn create_merge_commit(&self, message: &str, remote: Oid, file: &NormalizedPath)
    -> Result<Oid>;

    /// Push the current branch to its upstream
    fn push_current_branch(&self) -> Result<()>;
}

/// Author identity used when git config does not provide one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        Self {
            name: "bibsync".to_string(),
            email: "bibsync@localhost".to_string(),
        }
    }
}

/// [`VersionControl`] backed by libgit2.
#[derive(Debug, Clone)]
pub struct GitHandler {
    work_tree: PathBuf,
    identity: GitIdentity,
}

impl GitHandler {
    /// Handler for the repository whose work tree is `work_tree`.
    pub fn new(work_tree: impl Into<PathBuf>) -> Self {
        Self {
            work_tree: work_tree.into(),
            identity: GitIdentity::default(),
        }
    }

    /// Discover the repository enclosing `path` (a file or directory).
    ///
    /// # Errors
    ///
    /// [`Error::RepositoryNotFound`] when no repository encloses the path and
    /// [`Error::BareRepository`] when the repository has no work tree.
    pub fn from_any_path(path: &Path) -> Result<Self> {
        let start = match path.parent() {
            Some(parent) if !path.is_dir() && !parent.as_os_str().is_empty() => parent,
            Some(_) if !path.is_dir() => Path::new("."),
            _ => path,
        };

        let repo = Repository::discover(start).map_err(|_| Error::RepositoryNotFound {
            path: path.to_path_buf(),
        })?;
        let work_tree = repo.workdir().ok_or_else(|| Error::BareRepository {
            path: repo.path().to_path_buf(),
        })?;

        Ok(Self::new(work_tree))
    }

    /// Use `identity` when the repository has no configured author.
    pub fn with_identity(mut self, identity: GitIdentity) -> Self {
        self.identity = identity;
        self
    }

    fn signature(&self, repo: &Repository) -> Result<Signature<'static>> {
        match repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(e) if e.code() == ErrorCode::NotFound => {
                tracing::debug!(name = %self.identity.name, "Using fallback commit identity");
                Ok(Signature::now(&self.identity.name, &self.identity.email)?)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl VersionControl for GitHandler {
    fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    fn open(&self) -> Result<Repository> {
        Repository::open(&self.work_tree).map_err(|e| match e.code() {
            ErrorCode::NotFound => Error::RepositoryNotFound {
                path: self.work_tree.clone(),
            },
            _ => Error::Git(e),
        })
    }

    fn fetch_current_branch(&self) -> Result<()> {
        let repo = self.open()?;
        let tracking = tracking_branch(&repo)?;

        let mut remote = repo
            .find_remote(&tracking.remote)
            .map_err(|_| Error::RemoteNotFound {
                name: tracking.remote.clone(),
            })?;

        let refspec = format!("+{}:{}", tracking.merge_ref, tracking.upstream_ref);
        let mut options = FetchOptions::new();
        options.remote_callbacks(remote_callbacks(&repo));

        remote
            .fetch(&[&refspec], Some(&mut options), None)
            .map_err(|e| Error::FetchFailed {
                message: e.message().to_string(),
            })?;

        tracing::debug!(remote = %tracking.remote, refspec = %refspec, "Fetched upstream");
        Ok(())
    }

    fn create_commit(&self, message: &str, amend: bool) -> Result<bool> {
        let repo = self.open()?;

        let mut index = repo.index()?;
        index.update_all(["*"], None)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let head = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };

        let sig = self.signature(&repo)?;

        if let Some(parent) = &head {
            if amend {
                let oid = parent.amend(
                    Some("HEAD"),
                    Some(&sig),
                    Some(&sig),
                    None,
                    Some(message),
                    Some(&tree),
                )?;
                tracing::info!(commit = %oid, "Amended HEAD commit");
                return Ok(true);
            }
            if parent.tree_id() == tree.id() {
                tracing::debug!("Nothing to commit");
                return Ok(false);
            }
        } else if index.is_empty() {
            return Ok(false);
        }

        let parents: Vec<&git2::Commit<'_>> = head.iter().collect();
        let oid = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;
        tracing::info!(commit = %oid, "Created commit");
        Ok(true)
    }

    fn create_merge_commit(
        &self,
        message: &str,
        remote: Oid,
        file: &NormalizedPath,
    ) -> Result<Oid> {
        let repo = self.open()?;
        let head = repo.head()?.peel_to_commit()?;
        let theirs = repo.find_commit(remote)?;

        let mut index = repo.merge_commits(&head, &theirs, None)?;
        if let Err(e) = index.conflict_remove(Path::new(file.as_str()))
            && e.code() != ErrorCode::NotFound
        {
            return Err(e.into());
        }
        if index.has_conflicts() {
            let paths = conflicting_paths(&index)?;
            return Err(Error::MergeConflict { paths });
        }

        let content = bibsync_fs::io::read_text(&NormalizedPath::new(
            self.work_tree.join(file.to_native()),
        ))?;
        let blob = repo.blob(content.as_bytes())?;
        let mode = head
            .tree()?
            .get_path(Path::new(file.as_str()))
            .map(|entry| entry.filemode() as u32)
            .unwrap_or(0o100644);

        index.add(&IndexEntry {
            ctime: IndexTime::new(0, 0),
            mtime: IndexTime::new(0, 0),
            dev: 0,
            ino: 0,
            mode,
            uid: 0,
            gid: 0,
            file_size: content.len() as u32,
            id: blob,
            flags: 0,
            flags_extended: 0,
            path: file.as_str().as_bytes().to_vec(),
        })?;

        let tree = repo.find_tree(index.write_tree_to(&repo)?)?;
        let sig = self.signature(&repo)?;
        let oid = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&head, &theirs])?;

        repo.checkout_head(Some(CheckoutBuilder::new().force()))?;

        tracing::info!(commit = %oid, remote = %remote, "Created merge commit");
        Ok(oid)
    }

    fn push_current_branch(&self) -> Result<()> {
        let repo = self.open()?;
        let tracking = tracking_branch(&repo)?;

        let mut remote = repo
            .find_remote(&tracking.remote)
            .map_err(|_| Error::RemoteNotFound {
                name: tracking.remote.clone(),
            })?;

        let refspec = format!("{}:{}", tracking.local_ref, tracking.merge_ref);
        let rejection: RefCell<Option<String>> = RefCell::new(None);

        {
            let mut callbacks = remote_callbacks(&repo);
            callbacks.push_update_reference(|_ref_name, status| {
                if let Some(msg) = status {
                    *rejection.borrow_mut() = Some(msg.to_string());
                }
                Ok(())
            });

            let mut options = PushOptions::new();
            options.remote_callbacks(callbacks);

            if let Err(e) = remote.push(&[&refspec], Some(&mut options)) {
                let message = e.message().to_string();
                if is_non_fast_forward(&message) {
                    return Err(Error::PushRejected { message });
                }
                return Err(Error::PushFailed { message });
            }
        }

        if let Some(message) = rejection.into_inner() {
            return Err(Error::PushRejected { message });
        }

        tracing::info!(remote = %tracking.remote, refspec = %refspec, "Pushed");
        Ok(())
    }
}

fn conflicting_paths(index: &git2::Index) -> Result<Vec<String>> {
    let mut paths = Vec::new();
    for conflict in index.conflicts()? {
        let conflict = conflict?;
        if let Some(entry) = conflict.our.or(conflict.their).or(conflict.ancestor) {
            paths.push(String::from_utf8_lossy(&entry.path).into_owned());
        }
    }
    Ok(paths)
}
