//! Computing and writing the merged database.

use std::path::Path;

use bibsync_fs::{NormalizedPath, WorkTreeFile, io};
use bibsync_model::{RecordFormat, RecordSet};

use crate::Result;
use crate::merge::merge_record_sets;

/// Result of a merge attempt.
///
/// An unsuccessful merge leaves the target file untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    pub successful: bool,
}

impl MergeOutcome {
    pub fn success() -> Self {
        Self { successful: true }
    }

    pub fn failure() -> Self {
        Self { successful: false }
    }
}

/// Merges record sets and writes the result with a [`RecordFormat`].
#[derive(Debug, Clone, Default)]
pub struct SemanticMergeExecutor<F> {
    format: F,
}

impl<F: RecordFormat> SemanticMergeExecutor<F> {
    pub fn new(format: F) -> Self {
        Self { format }
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    /// Merge `local` with `remote` against `base` and write the result to
    /// `target`.
    ///
    /// `remote` is the effective remote: conflict resolutions have already
    /// been substituted into it. The merge is only written when its
    /// serialization reads back to the same records; otherwise the outcome is
    /// unsuccessful and the file is left alone.
    ///
    /// # Errors
    ///
    /// [`Error::PathOutsideWorkTree`](crate::Error::PathOutsideWorkTree) when
    /// `target` does not resolve inside `work_tree` (nothing is touched), and
    /// filesystem errors from the write.
    pub fn merge(
        &self,
        base: &RecordSet,
        local: &RecordSet,
        remote: &RecordSet,
        target: &Path,
        work_tree: &Path,
    ) -> Result<MergeOutcome> {
        let file = WorkTreeFile::resolve(work_tree, target)?;

        let merged = merge_record_sets(base, local, remote);
        let text = self.format.write(&merged);

        match self.format.parse(&text) {
            Ok(reparsed) if reparsed == merged => {}
            Ok(_) => {
                tracing::warn!(path = %file.relative(), "Merged database does not survive serialization");
                return Ok(MergeOutcome::failure());
            }
            Err(e) => {
                tracing::warn!(path = %file.relative(), error = %e, "Merged database does not parse");
                return Ok(MergeOutcome::failure());
            }
        }

        io::write_atomic(&NormalizedPath::new(file.absolute()), text.as_bytes())?;

        tracing::info!(
            path = %file.relative(),
            records = merged.len(),
            "Wrote merged database"
        );
        Ok(MergeOutcome::success())
    }
}
