//! Working-directory scanner
//!
//! Builds a fresh [`FileTree`] from the filesystem, hashing every regular
//! file and staging its content into the blob store as it goes. Staged
//! blobs are invisible until a commit record references them, so a scan
//! that fails partway leaves no observable repository state behind.

use crate::error::{StorageError, VcsError};
use crate::store::BlobStore;
use crate::tree::walker::{Entry, Walker};
use crate::tree::FileTree;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Result of a working-directory scan.
#[derive(Debug)]
pub struct ScanOutcome {
    pub tree: FileTree,
    pub files: usize,
    pub bytes: u64,
}

/// One-shot scanner over a working directory.
pub struct Scanner<'a> {
    root: &'a Path,
    blobs: &'a BlobStore,
    ignore: &'a [String],
}

impl<'a> Scanner<'a> {
    pub fn new(root: &'a Path, blobs: &'a BlobStore, ignore: &'a [String]) -> Self {
        Scanner { root, blobs, ignore }
    }

    /// Scan the working directory into a fresh tree.
    ///
    /// All-or-nothing: any read or staging failure aborts the scan.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn scan(&self) -> Result<ScanOutcome, VcsError> {
        let start = Instant::now();

        let entries = Walker::new(self.root.to_path_buf())
            .with_ignored(self.ignore)
            .walk()?;

        let mut tree = FileTree::new();
        let mut files = 0usize;
        let mut bytes = 0u64;

        for entry in entries {
            let file_path = match entry {
                Entry::File { path, .. } => path,
                // Directories materialize through file insertion; empty
                // directories are not tracked.
                Entry::Directory { .. } => continue,
            };

            let content = std::fs::read(&file_path).map_err(|e| {
                StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("failed to read file {:?}: {}", file_path, e),
                ))
            })?;

            let content_hash = self.blobs.put(&content)?;
            let size = content.len() as u64;
            let tree_path = relative_tree_path(self.root, &file_path)?;

            trace!(path = %tree_path, hash = %hex::encode(content_hash), "staged file");

            tree.insert(&tree_path, content_hash, size)?;
            files += 1;
            bytes += size;
        }

        debug!(files, bytes, "scan collected files");
        info!(
            files,
            duration_ms = start.elapsed().as_millis() as u64,
            "working directory scanned"
        );

        Ok(ScanOutcome { tree, files, bytes })
    }
}

/// Convert an absolute path below `root` into a `/`-separated tree path.
fn relative_tree_path(root: &Path, file_path: &PathBuf) -> Result<String, VcsError> {
    let relative = file_path.strip_prefix(root).map_err(|_| {
        StorageError::Decode(format!(
            "path {:?} is outside the working directory {:?}",
            file_path, root
        ))
    })?;

    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    Ok(segments.join("/"))
}
