//! Repository configuration
//!
//! A single TOML file under the storage subtree. Every field has a
//! default, so a missing or partial file is never an error; a present but
//! malformed file is reported as corruption.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Default author front-ends may offer; `commit()` always takes an
    /// explicit author.
    #[serde(default)]
    pub author: Option<String>,

    /// Entry names excluded from scans, in addition to the storage
    /// subtree which is always excluded.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        RepoConfig {
            author: None,
            ignore: Vec::new(),
        }
    }
}

impl RepoConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<RepoConfig, StorageError> {
        if !path.exists() {
            return Ok(RepoConfig::default());
        }

        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| StorageError::Decode(format!("invalid repository config: {}", e)))
    }

    /// Write configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| StorageError::Decode(format!("failed to encode config: {}", e)))?;
        crate::store::atomic_write(path, text.as_bytes())
    }
}
