//! The sync service: pull and push of a single database file.

use std::path::Path;

use bibsync_fs::{NormalizedPath, WorkTreeFile, io};
use bibsync_git::{
    Oid, StatusSnapshot, SyncStatus, VersionControl, check_status, locate_merge_commits,
    read_file_from_commit,
};
use bibsync_merge::{
    ConflictResolutionStrategy, EntryConflict, SemanticMergeExecutor, detect_conflicts,
    replace_entries,
};
use bibsync_model::{RecordFormat, RecordSet};

use crate::outcome::{AbortReason, PullOutcome, PushOutcome};
use crate::{Result, SyncConfig};

/// Base, local and remote snapshots of the database file.
struct Snapshots {
    base: RecordSet,
    local: RecordSet,
    remote: RecordSet,
    /// Working file content before the merge, for restoring on failure
    local_text: Option<String>,
    remote_commit: Oid,
}

enum MergeStep {
    Committed(Oid),
    Aborted(AbortReason),
}

/// Synchronizes a database file with the upstream of the current branch.
///
/// Holds no state between calls besides its collaborators; every operation
/// reads the repository status afresh.
pub struct GitSyncService<V, S, F> {
    config: SyncConfig,
    backend: V,
    strategy: S,
    executor: SemanticMergeExecutor<F>,
}

impl<V, S, F> GitSyncService<V, S, F>
where
    V: VersionControl,
    S: ConflictResolutionStrategy,
    F: RecordFormat,
{
    pub fn new(config: SyncConfig, backend: V, strategy: S, executor: SemanticMergeExecutor<F>) -> Self {
        Self {
            config,
            backend,
            strategy,
            executor,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn backend(&self) -> &V {
        &self.backend
    }

    /// Pull: merge upstream changes into `file` and record a merge commit.
    ///
    /// Returns [`PullOutcome::UpToDate`] without fetching when the branch is
    /// up to date with or ahead of its tracking ref. Precondition failures
    /// and cancelled resolutions are reported as [`PullOutcome::Aborted`] and
    /// leave the repository untouched.
    ///
    /// # Errors
    ///
    /// [`Error::PathOutsideWorkTree`](crate::Error::PathOutsideWorkTree) for a
    /// file outside the work tree; git, parse and filesystem failures.
    pub fn fetch_and_merge(&self, file: &Path) -> Result<PullOutcome> {
        let target = self.resolve(file)?;
        let status = check_status(target.absolute());

        if let Some(reason) = precondition_failure(&status) {
            return Ok(PullOutcome::Aborted(abort("Pull", reason)));
        }

        match status.sync_status {
            SyncStatus::UpToDate | SyncStatus::Ahead => {
                tracing::info!(path = %target.relative(), "Pull skipped: already up to date with remote");
                Ok(PullOutcome::UpToDate)
            }
            SyncStatus::Behind | SyncStatus::Diverged => {
                let message = self.config.commit_messages.auto_merge.clone();
                match self.merge_upstream(&target, &message)? {
                    MergeStep::Committed(commit) => Ok(PullOutcome::Merged { commit }),
                    MergeStep::Aborted(reason) => Ok(PullOutcome::Aborted(abort("Pull", reason))),
                }
            }
            SyncStatus::Conflict | SyncStatus::Untracked | SyncStatus::Unknown => Ok(
                PullOutcome::Aborted(abort("Pull", AbortReason::UnsupportedStatus(status.sync_status))),
            ),
        }
    }

    /// Push: publish local work on the current branch.
    ///
    /// Uncommitted changes are committed first when the branch is otherwise
    /// up to date. A diverged branch is merged semantically before pushing.
    /// A branch behind its upstream is never pushed.
    ///
    /// # Errors
    ///
    /// As for [`fetch_and_merge`](Self::fetch_and_merge), plus push failures.
    pub fn push(&self, file: &Path) -> Result<PushOutcome> {
        let target = self.resolve(file)?;
        let status = check_status(target.absolute());

        if !status.tracking {
            return Ok(PushOutcome::Aborted(abort("Push", AbortReason::NotTracked)));
        }

        let messages = &self.config.commit_messages;
        match status.sync_status {
            SyncStatus::UpToDate => {
                if self.backend.create_commit(&messages.local_changes, false)? {
                    self.backend.push_current_branch()?;
                    tracing::info!(path = %target.relative(), "Committed and pushed local changes");
                    Ok(PushOutcome::Pushed { committed: true })
                } else {
                    tracing::info!("No changes to commit, skipping push");
                    Ok(PushOutcome::NothingToPush)
                }
            }
            SyncStatus::Ahead => {
                self.backend.push_current_branch()?;
                tracing::info!(path = %target.relative(), "Pushed local commits");
                Ok(PushOutcome::Pushed { committed: false })
            }
            SyncStatus::Behind => Ok(PushOutcome::Aborted(abort("Push", AbortReason::BehindRemote))),
            SyncStatus::Diverged => {
                if status.uncommitted_changes {
                    return Ok(PushOutcome::Aborted(abort(
                        "Push",
                        AbortReason::UncommittedChanges,
                    )));
                }
                match self.merge_upstream(&target, &messages.diverged_merge)? {
                    MergeStep::Committed(_) => {
                        self.backend.push_current_branch()?;
                        tracing::info!(path = %target.relative(), "Merged and pushed");
                        Ok(PushOutcome::Pushed { committed: true })
                    }
                    MergeStep::Aborted(reason) => Ok(PushOutcome::Aborted(abort("Push", reason))),
                }
            }
            SyncStatus::Conflict => Ok(PushOutcome::Aborted(abort(
                "Push",
                AbortReason::UnresolvedConflict,
            ))),
            SyncStatus::Untracked | SyncStatus::Unknown => Ok(PushOutcome::Aborted(abort(
                "Push",
                AbortReason::UnsupportedStatus(status.sync_status),
            ))),
        }
    }

    /// Conflicts a merge with the current tracking ref would raise.
    ///
    /// Does not fetch and does not modify anything.
    pub fn preview_conflicts(&self, file: &Path) -> Result<Vec<EntryConflict>> {
        let target = self.resolve(file)?;
        let snapshots = self.load_snapshots(&target)?;
        Ok(detect_conflicts(&snapshots.base, &snapshots.local, &snapshots.remote))
    }

    fn resolve(&self, file: &Path) -> Result<WorkTreeFile> {
        Ok(WorkTreeFile::resolve(self.backend.work_tree(), file)?)
    }

    /// Fetch, merge upstream into the working file and commit the merge.
    fn merge_upstream(&self, target: &WorkTreeFile, message: &str) -> Result<MergeStep> {
        self.backend.fetch_current_branch()?;

        let snapshots = self.load_snapshots(target)?;
        let conflicts = detect_conflicts(&snapshots.base, &snapshots.local, &snapshots.remote);

        let effective_remote = if conflicts.is_empty() {
            snapshots.remote.clone()
        } else {
            tracing::debug!(conflicts = conflicts.len(), "Asking strategy to resolve conflicts");
            let resolved = self.strategy.resolve_conflicts(&conflicts);
            if resolved.is_empty() {
                return Ok(MergeStep::Aborted(AbortReason::ResolutionCancelled));
            }
            let covered = conflicts.iter().all(|conflict| {
                resolved
                    .iter()
                    .any(|record| record.citation_key() == Some(conflict.key.as_str()))
            });
            if !covered {
                return Ok(MergeStep::Aborted(AbortReason::ResolutionIncomplete));
            }
            replace_entries(&snapshots.remote, &resolved)
        };

        let outcome = self.executor.merge(
            &snapshots.base,
            &snapshots.local,
            &effective_remote,
            target.absolute(),
            self.backend.work_tree(),
        )?;
        if !outcome.successful {
            return Ok(MergeStep::Aborted(AbortReason::MergeFailed));
        }

        match self
            .backend
            .create_merge_commit(message, snapshots.remote_commit, target.relative())
        {
            Ok(commit) => Ok(MergeStep::Committed(commit)),
            Err(e) => {
                tracing::warn!(error = %e, "Could not record merge commit, restoring working file");
                restore(target, snapshots.local_text.as_deref())?;
                Err(e.into())
            }
        }
    }

    fn load_snapshots(&self, target: &WorkTreeFile) -> Result<Snapshots> {
        let repo = self.backend.open()?;
        let triple = locate_merge_commits(&repo)?;
        let format = self.executor.format();

        let base_text = match triple.base {
            Some(base) => read_file_from_commit(&repo, base, target.relative())?,
            None => None,
        };
        let remote_text = read_file_from_commit(&repo, triple.remote, target.relative())?;
        let local_text = io::read_optional_text(&NormalizedPath::new(target.absolute()))?;

        Ok(Snapshots {
            base: format.parse_optional(base_text.as_deref())?,
            local: format.parse_optional(local_text.as_deref())?,
            remote: format.parse_optional(remote_text.as_deref())?,
            local_text,
            remote_commit: triple.remote,
        })
    }
}

/// The first failed pull precondition, in check order.
fn precondition_failure(status: &StatusSnapshot) -> Option<AbortReason> {
    if !status.tracking {
        Some(AbortReason::NotTracked)
    } else if status.conflict {
        Some(AbortReason::UnresolvedConflict)
    } else if status.uncommitted_changes {
        Some(AbortReason::UncommittedChanges)
    } else {
        None
    }
}

fn abort(operation: &str, reason: AbortReason) -> AbortReason {
    tracing::warn!("{operation} aborted: {reason}");
    reason
}

fn restore(target: &WorkTreeFile, original: Option<&str>) -> Result<()> {
    let path = NormalizedPath::new(target.absolute());
    match original {
        Some(text) => io::write_atomic(&path, text.as_bytes())?,
        None => {
            io::remove_if_exists(&path)?;
        }
    }
    Ok(())
}
