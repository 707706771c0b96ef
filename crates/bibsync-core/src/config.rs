//! Sync configuration loaded from `.bibsync.toml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use bibsync_fs::{ConfigStore, NormalizedPath};
use bibsync_git::GitIdentity;
use bibsync_model::ImportPreferences;

use crate::Result;

/// Default configuration file name, looked up in the work-tree root.
pub const CONFIG_FILE: &str = ".bibsync.toml";

/// Messages for the commits bibsync creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitMessages {
    /// Merge commit recorded by pull
    pub auto_merge: String,
    /// Commit of local edits before pushing
    pub local_changes: String,
    /// Merge commit recorded by push on a diverged branch
    pub diverged_merge: String,
}

impl Default for CommitMessages {
    fn default() -> Self {
        Self {
            auto_merge: "Auto-merged by bibsync".to_string(),
            local_changes: "Changes committed by bibsync".to_string(),
            diverged_merge: "Merged changes".to_string(),
        }
    }
}

/// Complete sync configuration.
///
/// Every section is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub commit_messages: CommitMessages,

    /// Commit identity used when git config has none
    pub signature: GitIdentity,

    /// How values are normalized when databases are read
    pub import: ImportPreferences,
}

impl SyncConfig {
    /// Load `.bibsync.toml` from `work_tree`, or defaults when it is absent.
    pub fn load(work_tree: &Path) -> Result<Self> {
        Self::load_from(&work_tree.join(CONFIG_FILE))
    }

    /// Load a configuration file (TOML or JSON by extension).
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = ConfigStore::new().load_or_default(&NormalizedPath::new(path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.commit_messages.auto_merge, "Auto-merged by bibsync");
        assert_eq!(config.signature.email, "bibsync@localhost");
        assert_eq!(config.import.keyword_separator, ',');
    }
}
