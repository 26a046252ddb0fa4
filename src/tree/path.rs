//! Tree-path splitting and normalization

use crate::tree::TreeError;
use unicode_normalization::UnicodeNormalization;

/// Split a repository-relative path into ordered, normalized segments.
///
/// Both `/` and `\` are accepted as separators; empty and `.` segments are
/// dropped; each segment is normalized to Unicode NFC so the same file name
/// hashes identically regardless of how the OS reports it.
pub fn split(path: &str) -> Result<Vec<String>, TreeError> {
    let segments: Vec<String> = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.nfc().collect())
        .collect();

    if segments.is_empty() {
        return Err(TreeError::EmptyPath);
    }

    Ok(segments)
}

/// Join a parent path and a child name with the canonical `/` separator.
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
