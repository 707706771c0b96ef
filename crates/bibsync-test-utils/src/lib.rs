//! Shared test utilities for the bibsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] - git command helpers and single-repository fixtures
//! - [`remote`] - [`RemoteFixture`](remote::RemoteFixture): a bare remote with two clones

pub mod git;
pub mod remote;

pub use remote::RemoteFixture;
