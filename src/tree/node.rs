//! File-tree node types

use crate::tree::TreeError;
use crate::types::Hash;
use std::collections::BTreeMap;

/// File node: a leaf carrying the content hash and size of one regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    pub content_hash: Hash,
    pub size: u64,
}

/// Directory node: an interior node whose children are keyed by name.
///
/// `BTreeMap` keeps child iteration deterministic without a separate sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub name: String,
    pub children: BTreeMap<String, Node>,
}

/// A single file-tree entry. The discriminant is fixed at construction:
/// file nodes never gain children, directory nodes never carry a hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(FileNode),
    Directory(DirectoryNode),
}

impl FileNode {
    pub fn new(name: impl Into<String>, content_hash: Hash, size: u64) -> Self {
        FileNode {
            name: name.into(),
            content_hash,
            size,
        }
    }

    /// Human-readable size (B / KB / MB). Presentation only, never hashed.
    pub fn format_size(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * 1024;
        if self.size < KB {
            format!("{} B", self.size)
        } else if self.size < MB {
            format!("{:.1} KB", self.size as f64 / KB as f64)
        } else {
            format!("{:.1} MB", self.size as f64 / MB as f64)
        }
    }
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>) -> Self {
        DirectoryNode {
            name: name.into(),
            children: BTreeMap::new(),
        }
    }
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(f) => &f.name,
            Node::Directory(d) => &d.name,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(f) => Some(f),
            Node::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryNode> {
        match self {
            Node::Directory(d) => Some(d),
            Node::File(_) => None,
        }
    }

    /// Attach a child, replacing any existing child with the same name.
    ///
    /// Fails on file nodes: only directories have children.
    pub fn add_child(&mut self, child: Node) -> Result<(), TreeError> {
        match self {
            Node::Directory(dir) => {
                dir.children.insert(child.name().to_string(), child);
                Ok(())
            }
            Node::File(f) => Err(TreeError::NotADirectory(f.name.clone())),
        }
    }

    /// Look up a child by name. `None` on a miss or on a file node.
    pub fn child(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Directory(dir) => dir.children.get(name),
            Node::File(_) => None,
        }
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        match self {
            Node::Directory(dir) => dir.children.get_mut(name),
            Node::File(_) => None,
        }
    }
}
