//! Commit index
//!
//! One versioned record per commit, stored at
//! `{root}/{hex[0..2]}/{hex[2..4]}/{hex}.commit`. The record schema is
//! deliberately flat and decoupled from the in-memory tree types so the
//! persisted format can evolve independently: a tree round-trips as its
//! file listing (path, hash, size) and is rebuilt on load.
//!
//! Encoding: 4-byte little-endian format version, then a bincode payload.

use crate::commit::Commit;
use crate::error::StorageError;
use crate::tree::FileTree;
use crate::types::{CommitId, Hash};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

const COMMIT_RECORD_VERSION: u32 = 1;

/// One tracked file inside a commit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub content_hash: Hash,
    pub size: u64,
}

/// Persisted form of a commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub id: CommitId,
    pub timestamp_micros: i64,
    pub author: String,
    pub message: String,
    pub parent: Option<CommitId>,
    pub files: Vec<FileRecord>,
}

impl CommitRecord {
    pub(crate) fn from_commit(commit: &Commit) -> CommitRecord {
        let files = commit
            .tree()
            .all_files()
            .into_iter()
            .map(|(path, node)| FileRecord {
                path,
                content_hash: node.content_hash,
                size: node.size,
            })
            .collect();

        CommitRecord {
            id: commit.id(),
            timestamp_micros: commit.timestamp().timestamp_micros(),
            author: commit.author().to_string(),
            message: commit.message().to_string(),
            parent: commit.parent(),
            files,
        }
    }

    /// Rebuild the in-memory commit, re-verifying its id.
    pub(crate) fn into_commit(self) -> Result<Commit, StorageError> {
        let timestamp = DateTime::from_timestamp_micros(self.timestamp_micros)
            .ok_or_else(|| {
                StorageError::Decode(format!(
                    "timestamp out of range: {}",
                    self.timestamp_micros
                ))
            })?;

        let mut tree = FileTree::new();
        for file in &self.files {
            tree.insert(&file.path, file.content_hash, file.size)
                .map_err(|e| {
                    StorageError::Decode(format!("invalid tree in commit record: {}", e))
                })?;
        }

        Commit::from_parts(
            self.id,
            timestamp,
            self.author,
            self.message,
            self.parent,
            tree,
        )
    }
}

/// File-per-commit store under the storage subtree.
pub struct CommitStore {
    root: PathBuf,
}

impl CommitStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Self {
        CommitStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Persist a commit record atomically.
    pub fn put(&self, record: &CommitRecord) -> Result<(), StorageError> {
        let payload = bincode::serialize(record)
            .map_err(|e| StorageError::Decode(format!("failed to encode commit record: {}", e)))?;

        let mut serialized = Vec::with_capacity(4 + payload.len());
        serialized.extend_from_slice(&COMMIT_RECORD_VERSION.to_le_bytes());
        serialized.extend_from_slice(&payload);

        super::atomic_write(&self.record_path(&record.id), &serialized)?;
        trace!(id = %hex::encode(record.id), files = record.files.len(), "commit record stored");

        Ok(())
    }

    /// Load a commit record. `None` when no record exists for `id`.
    pub fn get(&self, id: &CommitId) -> Result<Option<CommitRecord>, StorageError> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        if bytes.len() < 4 {
            return Err(StorageError::Decode(
                "commit record too short".to_string(),
            ));
        }

        let version = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if version != COMMIT_RECORD_VERSION {
            return Err(StorageError::UnsupportedVersion(version));
        }

        let record: CommitRecord = bincode::deserialize(&bytes[4..])
            .map_err(|e| StorageError::Decode(format!("failed to decode commit record: {}", e)))?;

        Ok(Some(record))
    }

    pub fn contains(&self, id: &CommitId) -> bool {
        self.record_path(id).exists()
    }

    fn record_path(&self, id: &CommitId) -> PathBuf {
        let hex = hex::encode(id);
        self.root
            .join(&hex[0..2])
            .join(&hex[2..4])
            .join(format!("{}.commit", hex))
    }
}
