//! Digest computation using BLAKE3

use crate::tree::node::FileNode;
use crate::types::{CommitId, Hash};
use blake3::Hasher;

/// Compute the content hash for a blob's bytes.
pub fn content_hash(content: &[u8]) -> Hash {
    let mut hasher = Hasher::new();
    hasher.update(content);
    *hasher.finalize().as_bytes()
}

/// Compute the canonical digest of a tree's file listing.
///
/// digest = hash("tree" || count || per file: path_len || path || content_hash || size)
///
/// Callers must pass the listing in lexicographic path order so the same
/// snapshot always produces the same digest.
pub fn tree_digest(files: &[(String, &FileNode)]) -> Hash {
    let mut hasher = Hasher::new();

    hasher.update(b"tree");
    hasher.update(&(files.len() as u64).to_be_bytes());

    for (path, node) in files {
        let path_bytes = path.as_bytes();
        hasher.update(&(path_bytes.len() as u64).to_be_bytes());
        hasher.update(path_bytes);
        hasher.update(&node.content_hash);
        hasher.update(&node.size.to_be_bytes());
    }

    *hasher.finalize().as_bytes()
}

/// Compute a commit's identity digest.
///
/// id = hash("commit" || tree_digest || message || author || timestamp || parent)
///
/// The timestamp (microseconds since epoch) salts the digest so two commits
/// with identical content and metadata still get distinct ids.
pub fn commit_id(
    tree_digest: &Hash,
    message: &str,
    author: &str,
    timestamp_micros: i64,
    parent: Option<&CommitId>,
) -> CommitId {
    let mut hasher = Hasher::new();

    hasher.update(b"commit");
    hasher.update(tree_digest);

    let message_bytes = message.as_bytes();
    hasher.update(&(message_bytes.len() as u64).to_be_bytes());
    hasher.update(message_bytes);

    let author_bytes = author.as_bytes();
    hasher.update(&(author_bytes.len() as u64).to_be_bytes());
    hasher.update(author_bytes);

    hasher.update(&timestamp_micros.to_be_bytes());

    match parent {
        Some(parent_id) => {
            hasher.update(b"parent:");
            hasher.update(parent_id);
        }
        None => {
            hasher.update(b"root");
        }
    }

    *hasher.finalize().as_bytes()
}
