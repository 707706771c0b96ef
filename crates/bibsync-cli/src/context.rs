//! Per-invocation sync context
//!
//! Locates the repository enclosing the database file and loads the sync
//! configuration, so commands work from any directory.

use std::path::{Path, PathBuf};

use bibsync_core::{GitSyncService, SyncConfig};
use bibsync_git::{GitHandler, VersionControl};
use bibsync_merge::{ConflictResolutionStrategy, SemanticMergeExecutor};
use bibsync_model::BibtexFormat;

use crate::cli::StrategyArg;
use crate::error::{CliError, Result};
use crate::interactive::InteractiveResolver;

pub type Service = GitSyncService<GitHandler, Box<dyn ConflictResolutionStrategy>, BibtexFormat>;

/// The repository and configuration a database file belongs to
pub struct SyncContext {
    pub file: PathBuf,
    pub handler: GitHandler,
    pub config: SyncConfig,
}

impl SyncContext {
    /// Detect the repository enclosing `file` and load configuration from
    /// `config_path` or the work-tree default.
    pub fn detect(file: &Path, config_path: Option<&Path>) -> Result<Self> {
        if file.is_dir() {
            return Err(CliError::user(format!(
                "{} is a directory, expected a database file",
                file.display()
            )));
        }

        let handler = GitHandler::from_any_path(file)?;
        let config = match config_path {
            Some(path) => SyncConfig::load_from(path)?,
            None => SyncConfig::load(handler.work_tree())?,
        };
        tracing::debug!(work_tree = %handler.work_tree().display(), "Detected repository");

        let handler = handler.with_identity(config.signature.clone());
        Ok(Self {
            file: file.to_path_buf(),
            handler,
            config,
        })
    }

    /// Build the sync service with the chosen resolution strategy
    pub fn into_service(self, strategy: StrategyArg) -> Service {
        let strategy: Box<dyn ConflictResolutionStrategy> = match strategy {
            StrategyArg::Interactive => Box::new(InteractiveResolver::new()),
            StrategyArg::Local => Box::new(bibsync_merge::PreferSide::local()),
            StrategyArg::Remote => Box::new(bibsync_merge::PreferSide::remote()),
            StrategyArg::Cancel => Box::new(bibsync_merge::CancelResolution),
        };
        let executor = SemanticMergeExecutor::new(BibtexFormat::new(self.config.import.clone()));
        GitSyncService::new(self.config, self.handler, strategy, executor)
    }
}
