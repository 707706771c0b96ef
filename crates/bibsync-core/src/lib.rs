//! Orchestration layer for bibsync
//!
//! Ties the git layer and the semantic merge together into the two user
//! operations on a database file:
//!
//! - **pull** ([`GitSyncService::fetch_and_merge`]): fetch the upstream and
//!   merge it into the working file record by record
//! - **push** ([`GitSyncService::push`]): commit, merge if diverged, and push
//!
//! # Architecture
//!
//! ```text
//!                  bibsync-cli
//!                       |
//!                 bibsync-core
//!                       |
//!      +---------+------+-------+-----------+
//!      |         |              |           |
//! bibsync-fs bibsync-git bibsync-merge bibsync-model
//! ```

pub mod config;
pub mod error;
pub mod outcome;
pub mod service;

pub use config::{CONFIG_FILE, CommitMessages, SyncConfig};
pub use error::{Error, Result};
pub use outcome::{AbortReason, PullOutcome, PushOutcome};
pub use service::GitSyncService;
