//! Working-directory walker

use crate::error::StorageError;
use crate::store::STORAGE_DIR_NAME;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Filesystem entry types
#[derive(Debug, Clone)]
pub enum Entry {
    /// A regular file with its path and size
    File { path: PathBuf, size: u64 },
    /// A directory
    Directory { path: PathBuf },
}

impl Entry {
    pub fn path(&self) -> &PathBuf {
        match self {
            Entry::File { path, .. } | Entry::Directory { path } => path,
        }
    }
}

/// Deterministic working-directory walker.
///
/// The reserved storage subtree is always skipped, in addition to any
/// configured ignore names. Symlinks are not followed and entries are
/// sorted by path so repeated walks of an unchanged tree agree.
pub struct Walker {
    root: PathBuf,
    ignore: Vec<String>,
}

impl Walker {
    pub fn new(root: PathBuf) -> Self {
        Walker {
            root,
            ignore: vec![STORAGE_DIR_NAME.to_string()],
        }
    }

    /// Extend the skip list with additional entry names. The storage
    /// subtree stays excluded regardless.
    pub fn with_ignored(mut self, names: &[String]) -> Self {
        self.ignore.extend(names.iter().cloned());
        self
    }

    /// Walk the tree and collect all entries below the root, sorted by path.
    pub fn walk(&self) -> Result<Vec<Entry>, StorageError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.path() == self.root || !self.is_ignored(e.file_name()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("failed to walk directory: {}", e),
                ))
            })?;

            let path = entry.path().to_path_buf();

            // The root itself is not an entry, only its contents are.
            if path == self.root {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                StorageError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("failed to read metadata for {:?}: {}", path, e),
                ))
            })?;

            if metadata.is_file() {
                entries.push(Entry::File {
                    path,
                    size: metadata.len(),
                });
            } else if metadata.is_dir() {
                entries.push(Entry::Directory { path });
            }
            // Symlinks and special files are skipped.
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(entries)
    }

    fn is_ignored(&self, name: &std::ffi::OsStr) -> bool {
        let name = name.to_string_lossy();
        self.ignore.iter().any(|pattern| name == pattern.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walker_collects_files_and_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("file.txt"), "content").unwrap();
        fs::write(root.join("top.txt"), "content").unwrap();

        let entries = Walker::new(root).walk().unwrap();

        let files: Vec<_> = entries
            .iter()
            .filter(|e| matches!(e, Entry::File { .. }))
            .collect();
        let dirs: Vec<_> = entries
            .iter()
            .filter(|e| matches!(e, Entry::Directory { .. }))
            .collect();

        assert_eq!(files.len(), 2);
        assert_eq!(dirs.len(), 1);
    }

    #[test]
    fn test_walker_skips_storage_subtree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        fs::create_dir(root.join(STORAGE_DIR_NAME)).unwrap();
        fs::write(root.join(STORAGE_DIR_NAME).join("HEAD"), "x").unwrap();
        fs::write(root.join("tracked.txt"), "content").unwrap();

        let entries = Walker::new(root).walk().unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].path().ends_with("tracked.txt"));
    }

    #[test]
    fn test_walker_skips_configured_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        fs::create_dir(root.join("target")).unwrap();
        fs::write(root.join("target").join("out.bin"), "x").unwrap();
        fs::write(root.join("kept.txt"), "content").unwrap();

        let entries = Walker::new(root)
            .with_ignored(&["target".to_string()])
            .walk()
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].path().ends_with("kept.txt"));
    }

    #[test]
    fn test_walker_sorted_output() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        fs::write(root.join("z.txt"), "x").unwrap();
        fs::write(root.join("a.txt"), "x").unwrap();
        fs::write(root.join("m.txt"), "x").unwrap();

        let entries = Walker::new(root).walk().unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path().clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();

        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_walker_reports_file_sizes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();

        fs::write(root.join("five.txt"), "hello").unwrap();

        let entries = Walker::new(root).walk().unwrap();
        match &entries[0] {
            Entry::File { size, .. } => assert_eq!(*size, 5),
            other => panic!("expected file entry, got {:?}", other),
        }
    }
}
