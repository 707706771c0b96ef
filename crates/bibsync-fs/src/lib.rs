//! Filesystem helpers for bibsync
//!
//! Provides normalized path handling, work-tree containment checks,
//! atomic writes and format-agnostic configuration loading.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{NormalizedPath, WorkTreeFile};
