//! Record-level conflict detection.

use std::collections::{BTreeSet, HashSet};

use bibsync_model::{Record, RecordSet};

use crate::merge::{index_by_key, merge_record_fields};

/// Pseudo-field name under which entry type changes are reported.
pub const ENTRY_TYPE_FIELD: &str = "entrytype";

/// Which side of a conflict to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Local,
    Remote,
}

/// A record both sides changed incompatibly since the base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryConflict {
    pub key: String,
    pub base: Option<Record>,
    pub local: Option<Record>,
    pub remote: Option<Record>,
    /// Conflicting field names, entry type first
    pub fields: Vec<String>,
}

impl EntryConflict {
    pub fn base_value(&self, field: &str) -> Option<&str> {
        self.base.as_ref().and_then(|r| field_value(r, field))
    }

    pub fn local_value(&self, field: &str) -> Option<&str> {
        self.local.as_ref().and_then(|r| field_value(r, field))
    }

    pub fn remote_value(&self, field: &str) -> Option<&str> {
        self.remote.as_ref().and_then(|r| field_value(r, field))
    }

    /// One side deleted the record while the other edited it.
    pub fn is_deletion(&self) -> bool {
        self.local.is_none() || self.remote.is_none()
    }

    /// Build the resolved record.
    ///
    /// Non-conflicting changes from both sides are kept and `choose` picks the
    /// side for every conflicting field. When one side deleted the record the
    /// surviving version is returned unchanged.
    pub fn resolve(&self, mut choose: impl FnMut(&str) -> Side) -> Option<Record> {
        match (&self.local, &self.remote) {
            (Some(local), Some(remote)) => Some(merge_record_fields(
                self.base.as_ref(),
                local,
                remote,
                |field, l, r| {
                    let value = match choose(field) {
                        Side::Local => l,
                        Side::Remote => r,
                    };
                    value.map(str::to_string)
                },
            )),
            (Some(record), None) | (None, Some(record)) => Some(record.clone()),
            (None, None) => None,
        }
    }
}

/// Value of `field` in `record`, treating [`ENTRY_TYPE_FIELD`] as the entry type.
pub(crate) fn field_value<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    if field == ENTRY_TYPE_FIELD {
        Some(record.entry_type())
    } else {
        record.field(field)
    }
}

/// Find records changed incompatibly on both sides since `base`.
///
/// Keys are visited in local order, then remote-only keys in remote order.
/// Records without a citation key never conflict. A record edited on one
/// side and deleted on the other is a conflict.
pub fn detect_conflicts(base: &RecordSet, local: &RecordSet, remote: &RecordSet) -> Vec<EntryConflict> {
    let base_by_key = index_by_key(base);
    let local_by_key = index_by_key(local);
    let remote_by_key = index_by_key(remote);

    let mut visited = HashSet::new();
    let keys = local
        .records()
        .iter()
        .chain(remote.records())
        .filter_map(Record::citation_key)
        .filter(|key| visited.insert(*key));

    let mut conflicts = Vec::new();
    for key in keys {
        let b = base_by_key.get(key).copied();
        let l = local_by_key.get(key).copied();
        let r = remote_by_key.get(key).copied();

        if let Some(fields) = conflicting_fields(b, l, r) {
            tracing::debug!(key = %key, fields = ?fields, "Conflicting record");
            conflicts.push(EntryConflict {
                key: key.to_string(),
                base: b.cloned(),
                local: l.cloned(),
                remote: r.cloned(),
                fields,
            });
        }
    }

    conflicts
}

fn conflicting_fields(
    base: Option<&Record>,
    local: Option<&Record>,
    remote: Option<&Record>,
) -> Option<Vec<String>> {
    if local == remote {
        return None;
    }

    let fields = match (base, local, remote) {
        // added on both sides with different content
        (None, Some(l), Some(r)) => fields_where(&[l, r], |name| {
            field_value(l, name) != field_value(r, name)
        }),
        (Some(b), Some(l), Some(r)) => {
            if b == l || b == r {
                return None;
            }
            fields_where(&[b, l, r], |name| {
                let bv = field_value(b, name);
                let lv = field_value(l, name);
                let rv = field_value(r, name);
                lv != bv && rv != bv && lv != rv
            })
        }
        // deleted on one side, edited on the other
        (Some(b), None, Some(other)) | (Some(b), Some(other), None) => {
            if b == other {
                return None;
            }
            fields_where(&[b, other], |name| {
                field_value(b, name) != field_value(other, name)
            })
        }
        _ => return None,
    };

    (!fields.is_empty()).then_some(fields)
}

/// Field names of `records` (entry type first) for which `conflicting` holds.
fn fields_where(records: &[&Record], conflicting: impl Fn(&str) -> bool) -> Vec<String> {
    let names: BTreeSet<&str> = records.iter().copied().flat_map(Record::field_names).collect();

    std::iter::once(ENTRY_TYPE_FIELD)
        .chain(names)
        .filter(|name| conflicting(name))
        .map(str::to_string)
        .collect()
}
