//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// bibsync - Semantic git synchronization for BibTeX databases
#[derive(Parser, Debug)]
#[command(name = "bibsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to .bibsync.toml in the work tree)
    #[arg(long, global = true, env = "BIBSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// How conflicting records are resolved
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyArg {
    /// Ask for every conflicting record
    #[default]
    Interactive,
    /// Keep local values for conflicting fields
    Local,
    /// Take remote values for conflicting fields
    Remote,
    /// Abort when there is any conflict
    Cancel,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the sync status of a database file
    Status {
        /// Database file
        file: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Fetch the upstream of the current branch
    Fetch {
        /// Database file (locates the repository)
        file: PathBuf,
    },

    /// Merge upstream changes into the database
    ///
    /// Examples:
    ///   bibsync pull refs.bib                    # Resolve conflicts interactively
    ///   bibsync pull refs.bib --strategy remote  # Prefer upstream on conflicts
    Pull {
        /// Database file
        file: PathBuf,

        /// Conflict resolution strategy
        #[arg(short, long, value_enum, default_value_t)]
        strategy: StrategyArg,
    },

    /// Commit, merge if needed, and push the database
    Push {
        /// Database file
        file: PathBuf,

        /// Conflict resolution strategy used when the branch has diverged
        #[arg(short, long, value_enum, default_value_t)]
        strategy: StrategyArg,
    },

    /// List conflicts a merge with the last fetched upstream would raise
    Conflicts {
        /// Database file
        file: PathBuf,
    },

    /// Show commits that changed the database
    Log {
        /// Database file
        file: PathBuf,

        /// Maximum number of commits to show
        #[arg(short = 'n', long, default_value_t = 10)]
        max_count: usize,
    },
}
