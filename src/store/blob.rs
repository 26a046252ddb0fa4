//! Content-addressed blob store
//!
//! Raw file bytes stored at `{root}/{hex[0..2]}/{hex[2..4]}/{hex}`. The
//! fan-out keeps directories small; identical content maps to the same
//! path, which is what deduplicates blobs across files and commits.

use crate::error::StorageError;
use crate::tree::hasher;
use crate::types::Hash;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Open a blob store rooted at `root`. Directories are created lazily
    /// on the first write.
    pub fn open<P: AsRef<Path>>(root: P) -> Self {
        BlobStore {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Store `content` and return its hash. A no-op when the blob already
    /// exists.
    pub fn put(&self, content: &[u8]) -> Result<Hash, StorageError> {
        let hash = hasher::content_hash(content);
        let path = self.blob_path(&hash);

        if path.exists() {
            trace!(hash = %hex::encode(hash), "blob already present");
            return Ok(hash);
        }

        super::atomic_write(&path, content)?;
        trace!(hash = %hex::encode(hash), size = content.len(), "blob stored");

        Ok(hash)
    }

    /// Fetch a blob's bytes, verifying them against the requested hash.
    ///
    /// A mismatch means the store is corrupted; it is reported, never
    /// repaired.
    pub fn get(&self, hash: &Hash) -> Result<Vec<u8>, StorageError> {
        let path = self.blob_path(hash);
        if !path.exists() {
            return Err(StorageError::BlobMissing(*hash));
        }

        let content = fs::read(&path)?;

        let actual = hasher::content_hash(&content);
        if actual != *hash {
            return Err(StorageError::BlobHashMismatch {
                expected: *hash,
                actual,
            });
        }

        Ok(content)
    }

    pub fn exists(&self, hash: &Hash) -> bool {
        self.blob_path(hash).exists()
    }

    fn blob_path(&self, hash: &Hash) -> PathBuf {
        let hex = hex::encode(hash);
        self.root.join(&hex[0..2]).join(&hex[2..4]).join(&hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_put_and_get_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::open(temp_dir.path());

        let hash = store.put(b"file content").unwrap();
        assert_eq!(store.get(&hash).unwrap(), b"file content");
    }

    #[test]
    fn test_put_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::open(temp_dir.path());

        let hash1 = store.put(b"same").unwrap();
        let hash2 = store.put(b"same").unwrap();

        assert_eq!(hash1, hash2);
        assert!(store.exists(&hash1));
    }

    #[test]
    fn test_get_missing_blob() {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::open(temp_dir.path());

        let result = store.get(&[0u8; 32]);
        assert!(matches!(result, Err(StorageError::BlobMissing(_))));
    }

    #[test]
    fn test_fanout_path_structure() {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::open(temp_dir.path());

        let hash = store.put(b"anything").unwrap();
        let hex = hex::encode(hash);
        let expected = temp_dir
            .path()
            .join(&hex[0..2])
            .join(&hex[2..4])
            .join(&hex);

        assert!(expected.is_file());
    }

    #[test]
    fn test_corrupted_blob_detected_on_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = BlobStore::open(temp_dir.path());

        let hash = store.put(b"original").unwrap();
        let path = store.blob_path(&hash);
        std::fs::write(&path, b"tampered").unwrap();

        let result = store.get(&hash);
        assert!(matches!(
            result,
            Err(StorageError::BlobHashMismatch { .. })
        ));
    }
}
