//! Snapshot File Tree
//!
//! An N-ary tree of file and directory nodes representing one full
//! working-directory snapshot. Paths are repository-relative with `/`
//! separators; enumeration order is deterministic.

pub mod hasher;
pub mod node;
pub mod path;
pub mod scan;
pub mod walker;

pub use node::{DirectoryNode, FileNode, Node};

use crate::types::Hash;
use thiserror::Error;

/// Structural errors raised while building or querying a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{0:?} is a file node and cannot have children")]
    NotADirectory(String),

    #[error("path {path:?}: segment {segment:?} already exists as a file")]
    StructuralConflict { path: String, segment: String },

    #[error("empty path")]
    EmptyPath,
}

/// One full directory snapshot, rooted at a synthetic unnamed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    root: Node,
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTree {
    pub fn new() -> Self {
        FileTree {
            root: Node::Directory(DirectoryNode::new("")),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Insert a file at `path`, creating missing intermediate directories.
    ///
    /// Re-inserting an existing file path replaces it (last write wins).
    /// Fails with [`TreeError::StructuralConflict`] when any segment of the
    /// path already exists as a file node, including the terminal segment
    /// existing as a directory: a path cannot name both a file and a
    /// directory within one snapshot.
    pub fn insert(&mut self, tree_path: &str, content_hash: Hash, size: u64) -> Result<(), TreeError> {
        let segments = path::split(tree_path)?;
        let (file_name, dir_segments) = segments.split_last().expect("split returns non-empty");

        let mut current = &mut self.root;

        for segment in dir_segments {
            if current.child(segment).is_none() {
                current.add_child(Node::Directory(DirectoryNode::new(segment.clone())))?;
            } else if current.child(segment).map(Node::is_file) == Some(true) {
                return Err(TreeError::StructuralConflict {
                    path: tree_path.to_string(),
                    segment: segment.clone(),
                });
            }

            current = current
                .child_mut(segment)
                .expect("child inserted or present above");
        }

        if let Some(existing) = current.child(file_name) {
            if !existing.is_file() {
                return Err(TreeError::StructuralConflict {
                    path: tree_path.to_string(),
                    segment: file_name.clone(),
                });
            }
        }

        current.add_child(Node::File(FileNode::new(file_name.clone(), content_hash, size)))
    }

    /// Look up the node at `path` without mutating the tree.
    pub fn find(&self, tree_path: &str) -> Option<&Node> {
        let segments = path::split(tree_path).ok()?;

        let mut current = &self.root;
        for segment in &segments {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Enumerate every file node as `(path, node)` pairs in lexicographic
    /// path order.
    pub fn all_files(&self) -> Vec<(String, &FileNode)> {
        let mut files = Vec::new();
        collect_files(&self.root, "", &mut files);
        files.sort_by(|a, b| a.0.cmp(&b.0));
        files
    }

    pub fn file_count(&self) -> usize {
        self.all_files().len()
    }

    pub fn is_empty(&self) -> bool {
        match &self.root {
            Node::Directory(dir) => dir.children.is_empty(),
            Node::File(_) => false,
        }
    }

    /// Indented textual dump for diagnostics. Not used by any operation.
    pub fn render(&self) -> String {
        let mut out = String::new();
        render_node(&self.root, 0, &mut out);
        out
    }
}

fn collect_files<'a>(node: &'a Node, prefix: &str, files: &mut Vec<(String, &'a FileNode)>) {
    if let Node::Directory(dir) = node {
        for (name, child) in &dir.children {
            let child_path = path::join(prefix, name);
            match child {
                Node::File(file) => files.push((child_path, file)),
                Node::Directory(_) => collect_files(child, &child_path, files),
            }
        }
    }
}

fn render_node(node: &Node, depth: usize, out: &mut String) {
    if let Node::Directory(dir) = node {
        for child in dir.children.values() {
            let indent = "  ".repeat(depth);
            match child {
                Node::File(file) => {
                    out.push_str(&format!("{}{} ({})\n", indent, file.name, file.format_size()));
                }
                Node::Directory(sub) => {
                    out.push_str(&format!("{}{}/\n", indent, sub.name));
                    render_node(child, depth + 1, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::hasher::content_hash;

    #[test]
    fn test_insert_and_find_file() {
        let mut tree = FileTree::new();
        let hash = content_hash(b"hello");
        tree.insert("a.txt", hash, 5).unwrap();

        let node = tree.find("a.txt").unwrap();
        let file = node.as_file().unwrap();
        assert_eq!(file.content_hash, hash);
        assert_eq!(file.size, 5);
    }

    #[test]
    fn test_insert_creates_intermediate_directories() {
        let mut tree = FileTree::new();
        tree.insert("src/deep/nested/file.rs", [1u8; 32], 10).unwrap();

        assert!(tree.find("src").unwrap().as_directory().is_some());
        assert!(tree.find("src/deep/nested").unwrap().as_directory().is_some());
        assert!(tree.find("src/deep/nested/file.rs").unwrap().is_file());
    }

    #[test]
    fn test_find_missing_is_none() {
        let tree = FileTree::new();
        assert!(tree.find("nope.txt").is_none());
    }

    #[test]
    fn test_insert_through_file_conflicts() {
        let mut tree = FileTree::new();
        tree.insert("a.txt", [1u8; 32], 1).unwrap();

        let result = tree.insert("a.txt/b.txt", [2u8; 32], 2);
        assert!(matches!(
            result,
            Err(TreeError::StructuralConflict { .. })
        ));
    }

    #[test]
    fn test_insert_file_over_directory_conflicts() {
        let mut tree = FileTree::new();
        tree.insert("src/main.rs", [1u8; 32], 1).unwrap();

        let result = tree.insert("src", [2u8; 32], 2);
        assert!(matches!(
            result,
            Err(TreeError::StructuralConflict { .. })
        ));
    }

    #[test]
    fn test_insert_same_path_overwrites() {
        let mut tree = FileTree::new();
        tree.insert("a.txt", [1u8; 32], 1).unwrap();
        tree.insert("a.txt", [2u8; 32], 2).unwrap();

        let files = tree.all_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].1.content_hash, [2u8; 32]);
        assert_eq!(files[0].1.size, 2);
    }

    #[test]
    fn test_all_files_lexicographic_order() {
        let mut tree = FileTree::new();
        tree.insert("z.txt", [1u8; 32], 1).unwrap();
        tree.insert("a/m.txt", [2u8; 32], 2).unwrap();
        tree.insert("a/b.txt", [3u8; 32], 3).unwrap();
        tree.insert("b.txt", [4u8; 32], 4).unwrap();

        let files = tree.all_files();
        let paths: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["a/b.txt", "a/m.txt", "b.txt", "z.txt"]);
    }

    #[test]
    fn test_all_files_restartable() {
        let mut tree = FileTree::new();
        tree.insert("a.txt", [1u8; 32], 1).unwrap();
        tree.insert("b/c.txt", [2u8; 32], 2).unwrap();

        assert_eq!(tree.all_files(), tree.all_files());
    }

    #[test]
    fn test_empty_tree() {
        let tree = FileTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.file_count(), 0);
        assert!(tree.all_files().is_empty());
    }

    #[test]
    fn test_render_marks_directories_and_sizes() {
        let mut tree = FileTree::new();
        tree.insert("src/main.rs", [1u8; 32], 100).unwrap();
        tree.insert("README.md", [2u8; 32], 5).unwrap();

        let rendered = tree.render();
        assert!(rendered.contains("src/"));
        assert!(rendered.contains("main.rs (100 B)"));
        assert!(rendered.contains("README.md (5 B)"));
    }
}
