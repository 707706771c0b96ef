//! Command implementations for bibsync-cli

pub mod conflicts;
pub mod log;
pub mod status;
pub mod sync;

pub use conflicts::run_conflicts;
pub use log::run_log;
pub use status::run_status;
pub use sync::{run_fetch, run_pull, run_push};
