//! Status command implementation

use std::path::Path;

use colored::Colorize;

use bibsync_git::{SyncStatus, check_status};

use crate::error::Result;

/// Run the status command
pub fn run_status(file: &Path, json: bool) -> Result<()> {
    let status = check_status(file);

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let label = match status.sync_status {
        SyncStatus::UpToDate => status.sync_status.to_string().green(),
        SyncStatus::Ahead | SyncStatus::Behind => status.sync_status.to_string().yellow(),
        SyncStatus::Diverged | SyncStatus::Conflict => status.sync_status.to_string().red(),
        SyncStatus::Untracked | SyncStatus::Unknown => status.sync_status.to_string().dimmed(),
    };

    println!("{}", "Database Status".bold());
    println!();
    println!("{}:      {}", "File".dimmed(), file.display());
    println!("{}:    {}", "Status".dimmed(), label);
    println!("{}:   {}", "Tracked".dimmed(), yes_no(status.tracking));
    println!("{}:  {}", "Modified".dimmed(), yes_no(status.uncommitted_changes));
    println!("{}: {}", "Conflicts".dimmed(), yes_no(status.conflict));
    if let Some(head) = &status.head {
        println!("{}:      {}", "HEAD".dimmed(), &head[..head.len().min(7)]);
    }

    match status.sync_status {
        SyncStatus::Behind | SyncStatus::Diverged => {
            println!();
            println!("Run {} to merge upstream changes.", "bibsync pull".cyan());
        }
        SyncStatus::Ahead => {
            println!();
            println!("Run {} to publish local commits.", "bibsync push".cyan());
        }
        _ => {}
    }

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
