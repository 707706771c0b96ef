//! Database snapshot: ordered records plus metadata

use std::collections::BTreeMap;

use crate::Record;

const JABREF_META_PREFIX: &str = "jabref-meta:";

/// An immutable-by-convention snapshot of a bibliography database.
///
/// Carries no versioning information; base, local and remote snapshots are
/// separate values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
    preamble: Option<String>,
    strings: BTreeMap<String, String>,
    comments: Vec<String>,
}

impl RecordSet {
    /// The empty database.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// No records and no metadata.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
            && self.preamble.is_none()
            && self.strings.is_empty()
            && self.comments.is_empty()
    }

    /// First record carrying `key`.
    pub fn find_by_key(&self, key: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|r| r.citation_key() == Some(key))
    }

    /// Replace the first record with the same key as `record`, or append it.
    pub fn upsert(&mut self, record: Record) {
        let existing = record.citation_key().and_then(|key| {
            self.records
                .iter()
                .position(|r| r.citation_key() == Some(key))
        });
        match existing {
            Some(idx) => self.records[idx] = record,
            None => self.records.push(record),
        }
    }

    /// Remove every record carrying `key`, returning how many were removed.
    pub fn remove_by_key(&mut self, key: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.citation_key() != Some(key));
        before - self.records.len()
    }

    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    pub fn set_preamble(&mut self, preamble: Option<String>) {
        self.preamble = preamble.filter(|p| !p.trim().is_empty());
    }

    /// `@string` macro definitions, keyed by lowercase name.
    pub fn strings(&self) -> &BTreeMap<String, String> {
        &self.strings
    }

    pub fn set_string(&mut self, name: &str, value: &str) {
        self.strings.insert(name.trim().to_lowercase(), value.to_string());
    }

    pub fn remove_string(&mut self, name: &str) -> Option<String> {
        self.strings.remove(&name.to_lowercase())
    }

    /// `@comment` block contents in file order, including `jabref-meta` data.
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    pub fn push_comment(&mut self, comment: &str) {
        self.comments.push(comment.to_string());
    }
}

/// Identity of a comment block across versions of a database.
///
/// A `jabref-meta: name:value` comment is identified by its name, so a changed
/// value is an edit of the same block. Other comments are identified by their
/// full text.
pub fn comment_key(comment: &str) -> &str {
    if let Some(rest) = comment.strip_prefix(JABREF_META_PREFIX)
        && let Some(colon) = rest.find(':')
    {
        return comment[..JABREF_META_PREFIX.len() + colon].trim_end();
    }
    comment
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
