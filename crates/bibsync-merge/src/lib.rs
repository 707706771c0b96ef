//! Semantic merge for bibsync
//!
//! Compares base, local and remote [`RecordSet`](bibsync_model::RecordSet)
//! snapshots record by record and field by field:
//!
//! - [`detect_conflicts`] finds records both sides changed incompatibly
//! - [`ConflictResolutionStrategy`] turns conflicts into resolved records
//! - [`replace_entries`] folds resolutions into the remote snapshot
//! - [`SemanticMergeExecutor`] computes the merged database and writes it

pub mod conflict;
pub mod error;
pub mod executor;
pub mod merge;
pub mod strategy;

pub use conflict::{ENTRY_TYPE_FIELD, EntryConflict, Side, detect_conflicts};
pub use error::{Error, Result};
pub use executor::{MergeOutcome, SemanticMergeExecutor};
pub use merge::{merge_record_sets, replace_entries};
pub use strategy::{CancelResolution, ConflictResolutionStrategy, PreferSide};
