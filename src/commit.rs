//! Commits
//!
//! An immutable, hash-identified snapshot: one file tree plus provenance
//! (author, message, timestamp, optional parent). The id is computed from
//! a canonical encoding of all of these at construction; nothing about a
//! commit can change afterwards.

use crate::error::{StorageError, VcsError};
use crate::tree::{hasher, FileTree};
use crate::types::CommitId;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Commit {
    id: CommitId,
    timestamp: DateTime<Utc>,
    author: String,
    message: String,
    parent: Option<CommitId>,
    tree: FileTree,
}

impl Commit {
    /// Create a new commit, taking ownership of the tree.
    ///
    /// Ownership transfer is what guarantees the snapshot can never be
    /// aliased by a live scan. Message and author are trimmed and must be
    /// non-empty.
    pub fn new(
        message: &str,
        author: &str,
        parent: Option<CommitId>,
        tree: FileTree,
    ) -> Result<Commit, VcsError> {
        let (message, author) = validate_signature(message, author)?;

        let timestamp = Utc::now();
        let id = compute_id(&tree, &message, &author, timestamp, parent.as_ref());

        Ok(Commit {
            id,
            timestamp,
            author,
            message,
            parent,
            tree,
        })
    }

    /// Rehydrate a commit from persisted parts, verifying that the stored
    /// id still matches the recomputed one. A mismatch means the record
    /// was corrupted or tampered with.
    pub(crate) fn from_parts(
        id: CommitId,
        timestamp: DateTime<Utc>,
        author: String,
        message: String,
        parent: Option<CommitId>,
        tree: FileTree,
    ) -> Result<Commit, StorageError> {
        let actual = compute_id(&tree, &message, &author, timestamp, parent.as_ref());
        if actual != id {
            return Err(StorageError::CommitHashMismatch {
                expected: id,
                actual,
            });
        }

        Ok(Commit {
            id,
            timestamp,
            author,
            message,
            parent,
            tree,
        })
    }

    pub fn id(&self) -> CommitId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn parent(&self) -> Option<CommitId> {
        self.parent
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn file_count(&self) -> usize {
        self.tree.file_count()
    }

    /// Timestamp rendered for display, UTC.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn compute_id(
    tree: &FileTree,
    message: &str,
    author: &str,
    timestamp: DateTime<Utc>,
    parent: Option<&CommitId>,
) -> CommitId {
    let digest = hasher::tree_digest(&tree.all_files());
    hasher::commit_id(&digest, message, author, timestamp.timestamp_micros(), parent)
}

/// Trim and validate a commit's message and author.
pub(crate) fn validate_signature(message: &str, author: &str) -> Result<(String, String), VcsError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(VcsError::Validation(
            "commit message must not be empty".to_string(),
        ));
    }

    let author = author.trim();
    if author.is_empty() {
        return Err(VcsError::Validation(
            "commit author must not be empty".to_string(),
        ));
    }

    Ok((message.to_string(), author.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::hasher::content_hash;

    fn sample_tree() -> FileTree {
        let mut tree = FileTree::new();
        tree.insert("a.txt", content_hash(b"hello"), 5).unwrap();
        tree
    }

    #[test]
    fn test_new_commit_captures_fields() {
        let commit = Commit::new("initial", "Alice", None, sample_tree()).unwrap();

        assert_eq!(commit.message(), "initial");
        assert_eq!(commit.author(), "Alice");
        assert!(commit.is_root());
        assert_eq!(commit.file_count(), 1);
    }

    #[test]
    fn test_empty_message_rejected() {
        let result = Commit::new("   ", "Alice", None, FileTree::new());
        assert!(matches!(result, Err(VcsError::Validation(_))));
    }

    #[test]
    fn test_empty_author_rejected() {
        let result = Commit::new("msg", "", None, FileTree::new());
        assert!(matches!(result, Err(VcsError::Validation(_))));
    }

    #[test]
    fn test_message_and_author_trimmed() {
        let commit = Commit::new("  msg  ", " Alice ", None, FileTree::new()).unwrap();
        assert_eq!(commit.message(), "msg");
        assert_eq!(commit.author(), "Alice");
    }

    #[test]
    fn test_same_content_different_timestamp_different_id() {
        let a = Commit::new("msg", "Alice", None, sample_tree()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = Commit::new("msg", "Alice", None, sample_tree()).unwrap();

        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_from_parts_verifies_id() {
        let commit = Commit::new("msg", "Alice", None, sample_tree()).unwrap();

        let ok = Commit::from_parts(
            commit.id(),
            commit.timestamp(),
            commit.author().to_string(),
            commit.message().to_string(),
            commit.parent(),
            commit.tree().clone(),
        );
        assert!(ok.is_ok());

        let tampered = Commit::from_parts(
            [0u8; 32],
            commit.timestamp(),
            commit.author().to_string(),
            commit.message().to_string(),
            commit.parent(),
            commit.tree().clone(),
        );
        assert!(matches!(
            tampered,
            Err(StorageError::CommitHashMismatch { .. })
        ));
    }

    #[test]
    fn test_formatted_timestamp_shape() {
        let commit = Commit::new("msg", "Alice", None, FileTree::new()).unwrap();
        let formatted = commit.formatted_timestamp();

        // YYYY-MM-DD HH:MM:SS
        assert_eq!(formatted.len(), 19);
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[10..11], " ");
    }
}
