//! Fetch, pull and push command implementations

use std::path::Path;

use colored::Colorize;

use bibsync_core::{PullOutcome, PushOutcome};
use bibsync_git::{GitHandler, VersionControl};

use crate::cli::StrategyArg;
use crate::context::SyncContext;
use crate::error::{CliError, Result};

/// Run the fetch command
pub fn run_fetch(file: &Path) -> Result<()> {
    let handler = GitHandler::from_any_path(file)?;
    handler.fetch_current_branch()?;
    println!("{} Fetched upstream", "OK".green().bold());
    Ok(())
}

/// Run the pull command
pub fn run_pull(file: &Path, strategy: StrategyArg, config: Option<&Path>) -> Result<()> {
    let context = SyncContext::detect(file, config)?;
    let file = context.file.clone();
    let service = context.into_service(strategy);

    match service.fetch_and_merge(&file)? {
        PullOutcome::UpToDate => {
            println!("{} Already up to date", "OK".green().bold());
        }
        PullOutcome::Merged { commit } => {
            println!(
                "{} Merged upstream changes ({})",
                "OK".green().bold(),
                short(&commit.to_string()).cyan()
            );
            println!("Run {} to publish the merge.", "bibsync push".cyan());
        }
        PullOutcome::Aborted(reason) => {
            return Err(CliError::Aborted {
                operation: "Pull",
                reason,
            });
        }
    }
    Ok(())
}

/// Run the push command
pub fn run_push(file: &Path, strategy: StrategyArg, config: Option<&Path>) -> Result<()> {
    let context = SyncContext::detect(file, config)?;
    let file = context.file.clone();
    let service = context.into_service(strategy);

    match service.push(&file)? {
        PushOutcome::Pushed { committed } => {
            let detail = if committed { " (with new commit)" } else { "" };
            println!("{} Pushed{}", "OK".green().bold(), detail);
        }
        PushOutcome::NothingToPush => {
            println!("{} Nothing to push", "OK".green().bold());
        }
        PushOutcome::Aborted(reason) => {
            return Err(CliError::Aborted {
                operation: "Push",
                reason,
            });
        }
    }
    Ok(())
}

fn short(hash: &str) -> &str {
    &hash[..hash.len().min(7)]
}
