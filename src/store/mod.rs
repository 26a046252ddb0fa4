//! Repository Storage
//!
//! Everything the engine persists lives under the reserved storage subtree
//! `.strata/` inside the working directory: a content-addressed blob store,
//! one versioned record per commit, and the HEAD pointer. The subtree is
//! excluded from scans and never touched by checkout.

pub mod blob;
pub mod commit_index;

pub use blob::BlobStore;
pub use commit_index::{CommitRecord, CommitStore, FileRecord};

use crate::error::StorageError;
use crate::types::CommitId;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the reserved storage subtree inside a working directory.
pub const STORAGE_DIR_NAME: &str = ".strata";

const BLOBS_DIR: &str = "blobs";
const COMMITS_DIR: &str = "commits";
const HEAD_FILE: &str = "HEAD";
const CONFIG_FILE: &str = "config.toml";

/// Paths of the on-disk storage layout for one repository.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    pub fn for_working_dir(working_dir: &Path) -> Self {
        StorageLayout {
            root: working_dir.join(STORAGE_DIR_NAME),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn blobs_dir(&self) -> PathBuf {
        self.root.join(BLOBS_DIR)
    }

    pub fn commits_dir(&self) -> PathBuf {
        self.root.join(COMMITS_DIR)
    }

    pub fn head_path(&self) -> PathBuf {
        self.root.join(HEAD_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Create the storage directory structure.
    pub fn create(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.blobs_dir())?;
        fs::create_dir_all(self.commits_dir())?;
        debug!(root = %self.root.display(), "storage layout created");
        Ok(())
    }

    /// Read the HEAD pointer. `None` when no commit exists yet.
    pub fn read_head(&self) -> Result<Option<CommitId>, StorageError> {
        let path = self.head_path();
        if !path.exists() {
            return Ok(None);
        }

        let text = fs::read_to_string(&path)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let bytes = hex::decode(text)
            .map_err(|e| StorageError::Decode(format!("malformed HEAD pointer: {}", e)))?;
        let id: CommitId = bytes
            .try_into()
            .map_err(|_| StorageError::Decode("HEAD pointer has wrong length".to_string()))?;

        Ok(Some(id))
    }

    /// Atomically overwrite the HEAD pointer.
    pub fn write_head(&self, id: &CommitId) -> Result<(), StorageError> {
        atomic_write(&self.head_path(), hex::encode(id).as_bytes())
    }
}

/// Write `content` to `path` via a temporary file and rename, so readers
/// never observe a half-written file.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StorageError::Io(e)
    })?;

    Ok(())
}
