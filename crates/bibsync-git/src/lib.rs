//! Git layer for bibsync
//!
//! Reads repository state (sync status, merge revisions, historical file
//! content) and wraps the mutating git operations behind the
//! [`VersionControl`] trait.

pub mod branch;
pub mod commits;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod reader;
pub mod revision;
pub mod status;

pub use branch::{TrackingBranch, tracking_branch};
pub use commits::{CommitInfo, list_file_history};
pub use error::{Error, Result};
pub use handler::{GitHandler, GitIdentity, VersionControl};
pub use reader::read_file_from_commit;
pub use revision::{RevisionTriple, locate_merge_commits};
pub use status::{StatusSnapshot, SyncStatus, check_status};

pub use git2::Oid;
