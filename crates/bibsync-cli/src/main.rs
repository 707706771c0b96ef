//! bibsync CLI
//!
//! Synchronizes a BibTeX database with its git upstream, merging record by
//! record instead of line by line.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = execute_command(&cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match &cli.command {
        Commands::Status { file, json } => commands::run_status(file, *json),
        Commands::Fetch { file } => commands::run_fetch(file),
        Commands::Pull { file, strategy } => commands::run_pull(file, *strategy, config),
        Commands::Push { file, strategy } => commands::run_push(file, *strategy, config),
        Commands::Conflicts { file } => commands::run_conflicts(file, config),
        Commands::Log { file, max_count } => commands::run_log(file, *max_count),
    }
}
