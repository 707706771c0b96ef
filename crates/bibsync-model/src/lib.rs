//! Bibliography record model for bibsync
//!
//! - [`Record`]: one keyed entry with a normalized field map
//! - [`RecordSet`]: an ordered database snapshot plus `@string`, `@preamble`
//!   and `@comment` metadata
//! - [`value`]: how literal text and macro references share one field value
//! - [`RecordFormat`]: the serialization seam, implemented by [`BibtexFormat`]

pub mod bibtex;
pub mod database;
pub mod error;
pub mod format;
pub mod preferences;
pub mod record;
pub mod value;

pub use bibtex::BibtexFormat;
pub use database::{RecordSet, comment_key};
pub use error::{Error, Result};
pub use format::RecordFormat;
pub use preferences::ImportPreferences;
pub use record::Record;
