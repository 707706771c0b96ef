//! Serialization seam between text files and database snapshots

use crate::{RecordSet, Result};

/// Converts between serialized text and [`RecordSet`] snapshots.
pub trait RecordFormat {
    /// Parse serialized text into a database.
    fn parse(&self, text: &str) -> Result<RecordSet>;

    /// Serialize a database.
    fn write(&self, database: &RecordSet) -> String;

    /// Parse optional content; absent content is the empty database.
    fn parse_optional(&self, text: Option<&str>) -> Result<RecordSet> {
        match text {
            Some(text) => self.parse(text),
            None => Ok(RecordSet::empty()),
        }
    }
}
