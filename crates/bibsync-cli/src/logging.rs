//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// Logs go to stderr. `RUST_LOG` selects the level, defaulting to `warn`;
/// `verbose` raises the bibsync crates to `debug`.
pub fn init(verbose: bool) {
    let default = if verbose {
        "warn,bibsync=debug,bibsync_core=debug,bibsync_git=debug,bibsync_merge=debug"
    } else {
        "warn"
    };
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();

    tracing::debug!("Verbose mode enabled");
}
