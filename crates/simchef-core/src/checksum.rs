//! Archive digests and change detection between runs.
//!
//! Each leaf node carries the SHA-256 of its zip. Comparing the digest of the
//! archive being replaced with the new one tells whether a language actually
//! changed, which is what a rerun over an untouched site should report.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

/// What happened to an archive at its final path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveChange {
    Created,
    Changed,
    Unchanged,
}

impl ArchiveChange {
    /// Classify by the digest of the file that was there before (if any).
    pub fn between(previous: Option<&str>, current: &str) -> Self {
        match previous {
            None => ArchiveChange::Created,
            Some(prev) if prev == current => ArchiveChange::Unchanged,
            Some(_) => ArchiveChange::Changed,
        }
    }
}

impl fmt::Display for ArchiveChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArchiveChange::Created => "created",
            ArchiveChange::Changed => "changed",
            ArchiveChange::Unchanged => "unchanged",
        })
    }
}

/// Lowercase hex SHA-256 of the file at `path`.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).with_context(|| format!("hash {}", path.display()))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Digest of the file at `path` if it exists; `None` when there is nothing there yet.
pub fn sha256_if_exists(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    sha256_path(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_empty_archive_slot() {
        let f = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(
            sha256_path(f.path()).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn digest_matches_known_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("en.zip");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(
            sha256_path(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn missing_archive_has_no_digest() {
        let dir = tempfile::tempdir().unwrap();
        assert!(sha256_if_exists(&dir.path().join("nope.zip")).unwrap().is_none());
    }

    #[test]
    fn change_is_classified_against_previous_digest() {
        assert_eq!(ArchiveChange::between(None, "aa"), ArchiveChange::Created);
        assert_eq!(ArchiveChange::between(Some("aa"), "aa"), ArchiveChange::Unchanged);
        assert_eq!(ArchiveChange::between(Some("aa"), "bb"), ArchiveChange::Changed);
        assert_eq!(ArchiveChange::Unchanged.to_string(), "unchanged");
    }

    #[test]
    fn rewriting_same_bytes_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fr.zip");
        std::fs::write(&path, b"PK zip bytes").unwrap();
        let before = sha256_if_exists(&path).unwrap();
        std::fs::write(&path, b"PK zip bytes").unwrap();
        let after = sha256_path(&path).unwrap();
        assert_eq!(
            ArchiveChange::between(before.as_deref(), &after),
            ArchiveChange::Unchanged
        );
        std::fs::write(&path, b"PK other bytes").unwrap();
        let changed = sha256_path(&path).unwrap();
        assert_eq!(
            ArchiveChange::between(Some(after.as_str()), &changed),
            ArchiveChange::Changed
        );
    }
}
