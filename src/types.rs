//! Shared type aliases for content hashes and commit identifiers.

/// BLAKE3 digest of a blob's content.
pub type Hash = [u8; 32];

/// BLAKE3 digest identifying a commit.
pub type CommitId = [u8; 32];
