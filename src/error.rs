//! Error types for the snapshot version-control engine.

use crate::types::{CommitId, Hash};
use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blob not found: {}", hex::encode(.0))]
    BlobMissing(Hash),

    #[error("blob corrupted: expected {}, got {}", hex::encode(.expected), hex::encode(.actual))]
    BlobHashMismatch { expected: Hash, actual: Hash },

    #[error("commit record missing: {}", hex::encode(.0))]
    CommitMissing(CommitId),

    #[error(
        "commit record corrupted: stored id {}, recomputed {}",
        hex::encode(.expected),
        hex::encode(.actual)
    )]
    CommitHashMismatch { expected: CommitId, actual: CommitId },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("unsupported record version: {0}")]
    UnsupportedVersion(u32),
}

/// Repository-level errors
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unknown commit: {}", hex::encode(.0))]
    UnknownCommit(CommitId),

    #[error(transparent)]
    Tree(#[from] crate::tree::TreeError),

    #[error("repository already initialized at {0:?}")]
    AlreadyInitialized(PathBuf),

    #[error("not a repository: {0:?}")]
    NotARepository(PathBuf),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("logging init failed: {0}")]
    Logging(String),
}
