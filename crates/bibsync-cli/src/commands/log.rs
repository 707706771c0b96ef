//! Log command implementation

use std::path::Path;

use colored::Colorize;

use bibsync_fs::WorkTreeFile;
use bibsync_git::{GitHandler, VersionControl, list_file_history};

use crate::error::Result;

/// Run the log command
pub fn run_log(file: &Path, max_count: usize) -> Result<()> {
    let handler = GitHandler::from_any_path(file)?;
    let target = WorkTreeFile::resolve(handler.work_tree(), file).map_err(bibsync_core::Error::from)?;
    let repo = handler.open()?;

    let commits = list_file_history(&repo, target.relative(), max_count)?;
    if commits.is_empty() {
        println!("{}", "No commits touch this file".dimmed());
        return Ok(());
    }

    for commit in commits {
        println!(
            "{} {} {} {}",
            commit.hash.yellow(),
            commit.timestamp.format("%Y-%m-%d").to_string().dimmed(),
            commit.message,
            format!("<{}>", commit.author).dimmed()
        );
    }
    Ok(())
}
