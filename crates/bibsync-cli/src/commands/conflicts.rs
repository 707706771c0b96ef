//! Conflicts command implementation

use std::path::Path;

use colored::Colorize;

use crate::cli::StrategyArg;
use crate::context::SyncContext;
use crate::error::Result;
use crate::interactive::print_conflict;

/// Run the conflicts command
///
/// Compares against the last fetched upstream; run `bibsync fetch` first to
/// see the newest changes.
pub fn run_conflicts(file: &Path, config: Option<&Path>) -> Result<()> {
    let context = SyncContext::detect(file, config)?;
    let file = context.file.clone();
    let service = context.into_service(StrategyArg::Cancel);

    let conflicts = service.preview_conflicts(&file)?;
    if conflicts.is_empty() {
        println!("{} No conflicting records", "OK".green().bold());
        return Ok(());
    }

    println!("{} conflicting record(s):", conflicts.len().to_string().red().bold());
    for conflict in &conflicts {
        println!();
        println!("{}", conflict.key.cyan().bold());
        print_conflict(conflict);
    }
    Ok(())
}
