//! Conflict resolution strategies.

use bibsync_model::Record;

use crate::conflict::{EntryConflict, Side};

/// Turns detected conflicts into resolved records.
///
/// Implementations return one record per conflict, keyed like the conflict.
/// An empty result cancels the merge.
pub trait ConflictResolutionStrategy {
    fn resolve_conflicts(&self, conflicts: &[EntryConflict]) -> Vec<Record>;
}

impl<T: ConflictResolutionStrategy + ?Sized> ConflictResolutionStrategy for &T {
    fn resolve_conflicts(&self, conflicts: &[EntryConflict]) -> Vec<Record> {
        (**self).resolve_conflicts(conflicts)
    }
}

impl<T: ConflictResolutionStrategy + ?Sized> ConflictResolutionStrategy for Box<T> {
    fn resolve_conflicts(&self, conflicts: &[EntryConflict]) -> Vec<Record> {
        (**self).resolve_conflicts(conflicts)
    }
}

/// Resolves every conflicting field in favour of one side.
///
/// Non-conflicting changes from the other side are kept. A record deleted
/// on the preferred side is kept in the other side's version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferSide {
    side: Side,
}

impl PreferSide {
    pub fn local() -> Self {
        Self { side: Side::Local }
    }

    pub fn remote() -> Self {
        Self { side: Side::Remote }
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

impl ConflictResolutionStrategy for PreferSide {
    fn resolve_conflicts(&self, conflicts: &[EntryConflict]) -> Vec<Record> {
        conflicts
            .iter()
            .filter_map(|conflict| conflict.resolve(|_| self.side))
            .collect()
    }
}

/// Always cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct CancelResolution;

impl ConflictResolutionStrategy for CancelResolution {
    fn resolve_conflicts(&self, conflicts: &[EntryConflict]) -> Vec<Record> {
        tracing::debug!(conflicts = conflicts.len(), "Cancelling conflict resolution");
        Vec::new()
    }
}
