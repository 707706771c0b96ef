//! Pure three-way merge of record sets.

use std::collections::{BTreeSet, HashMap, HashSet};

use bibsync_model::{Record, RecordSet, comment_key};

use crate::conflict::{ENTRY_TYPE_FIELD, field_value};

/// Three-way choice between two versions of a value.
///
/// `local == remote` keeps local, an unchanged local takes remote, an
/// unchanged remote keeps local, and anything else takes remote. `None`
/// means absent, so one-sided deletions propagate.
pub fn pick<'a, T: PartialEq + ?Sized>(
    base: Option<&'a T>,
    local: Option<&'a T>,
    remote: Option<&'a T>,
) -> Option<&'a T> {
    if local == remote || remote == base {
        local
    } else {
        remote
    }
}

/// Merge two versions of the same record field by field.
///
/// `on_conflict` decides fields (including [`ENTRY_TYPE_FIELD`]) that both
/// sides changed to different values; everything else follows [`pick`].
pub(crate) fn merge_record_fields<F>(
    base: Option<&Record>,
    local: &Record,
    remote: &Record,
    mut on_conflict: F,
) -> Record
where
    F: FnMut(&str, Option<&str>, Option<&str>) -> Option<String>,
{
    let mut decide = |name: &str| -> Option<String> {
        let b = base.and_then(|r| field_value(r, name));
        let l = field_value(local, name);
        let r = field_value(remote, name);
        if l != r && l != b && r != b {
            on_conflict(name, l, r)
        } else {
            pick(b, l, r).map(str::to_string)
        }
    };

    let entry_type = decide(ENTRY_TYPE_FIELD).unwrap_or_else(|| remote.entry_type().to_string());
    let mut merged = Record::new(&entry_type);
    merged.set_citation_key(local.citation_key().or(remote.citation_key()));

    let names: BTreeSet<&str> = base
        .into_iter()
        .chain([local, remote])
        .flat_map(Record::field_names)
        .collect();
    for name in names {
        if let Some(value) = decide(name) {
            merged.set_field(name, &value);
        }
    }

    merged
}

/// Merge `local` and `remote` against their common ancestor `base`.
///
/// Records are matched by citation key and merged field by field; see
/// [`pick`] for the rule. The result keeps local order and appends records
/// that only exist remotely in remote order. Records without a key are kept
/// as they are locally; new keyless remote records are appended.
pub fn merge_record_sets(base: &RecordSet, local: &RecordSet, remote: &RecordSet) -> RecordSet {
    let base_by_key = index_by_key(base);
    let remote_by_key = index_by_key(remote);

    let mut merged = RecordSet::empty();
    let mut seen: HashSet<&str> = HashSet::new();

    for record in local.records() {
        let Some(key) = record.citation_key() else {
            merged.push(record.clone());
            continue;
        };
        if !seen.insert(key) {
            merged.push(record.clone());
            continue;
        }
        if let Some(result) = merge_keyed(
            base_by_key.get(key).copied(),
            Some(record),
            remote_by_key.get(key).copied(),
        ) {
            merged.push(result);
        }
    }

    for record in remote.records() {
        match record.citation_key() {
            Some(key) => {
                if !seen.insert(key) {
                    continue;
                }
                if let Some(result) = merge_keyed(base_by_key.get(key).copied(), None, Some(record)) {
                    merged.push(result);
                }
            }
            None => {
                let known = base.records().contains(record) || local.records().contains(record);
                if !known {
                    merged.push(record.clone());
                }
            }
        }
    }

    merged.set_preamble(
        pick(base.preamble(), local.preamble(), remote.preamble()).map(str::to_string),
    );

    let names: BTreeSet<&String> = base
        .strings()
        .keys()
        .chain(local.strings().keys())
        .chain(remote.strings().keys())
        .collect();
    for name in names {
        let value = pick(
            base.strings().get(name),
            local.strings().get(name),
            remote.strings().get(name),
        );
        if let Some(value) = value {
            merged.set_string(name, value);
        }
    }

    merge_comments(base, local, remote, &mut merged);
    merged
}

/// Comment blocks are matched by [`comment_key`] and follow [`pick`], in local
/// order with remote-only blocks appended.
fn merge_comments(base: &RecordSet, local: &RecordSet, remote: &RecordSet, merged: &mut RecordSet) {
    let base_by_key = comments_by_key(base);
    let local_by_key = comments_by_key(local);
    let remote_by_key = comments_by_key(remote);

    let mut seen: HashSet<&str> = HashSet::new();
    for comment in local.comments().iter().chain(remote.comments()) {
        let key = comment_key(comment);
        if !seen.insert(key) {
            continue;
        }
        let value = pick(
            base_by_key.get(key).copied(),
            local_by_key.get(key).copied(),
            remote_by_key.get(key).copied(),
        );
        if let Some(value) = value {
            merged.push_comment(value);
        }
    }
}

fn comments_by_key(set: &RecordSet) -> HashMap<&str, &str> {
    let mut index = HashMap::new();
    for comment in set.comments() {
        index.entry(comment_key(comment)).or_insert(comment.as_str());
    }
    index
}

fn merge_keyed(base: Option<&Record>, local: Option<&Record>, remote: Option<&Record>) -> Option<Record> {
    match (local, remote) {
        (Some(l), Some(r)) if l != r && base.is_some_and(|b| b != l && b != r) => {
            Some(merge_record_fields(base, l, r, |_, _, remote| remote.map(str::to_string)))
        }
        _ => pick(base, local, remote).cloned(),
    }
}

/// Substitute resolved records into `remote`, replacing the record with the
/// same key in place or appending it when remote no longer has one.
///
/// Resolved records without a citation key are ignored.
pub fn replace_entries(remote: &RecordSet, resolved: &[Record]) -> RecordSet {
    let mut result = remote.clone();
    for record in resolved {
        if record.citation_key().is_none() {
            tracing::warn!(entry_type = %record.entry_type(), "Ignoring resolved record without a key");
            continue;
        }
        result.upsert(record.clone());
    }
    result
}

/// First record per citation key.
pub(crate) fn index_by_key(set: &RecordSet) -> HashMap<&str, &Record> {
    let mut index = HashMap::new();
    for record in set.records() {
        if let Some(key) = record.citation_key() {
            index.entry(key).or_insert(record);
        }
    }
    index
}
