//! Archive store: which languages have been fetched, and where they live.
//!
//! Persisted as one JSON object keyed by display name:
//! `{ "English": { "url": .., "index_path": .., "resources": [..] } }`.
//! Read once at the start of a run and rewritten once at the end of the fetch phase.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::storage;

/// Metadata about one fetched page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    /// Display name; this is the map key on disk, not a field of the value.
    #[serde(skip)]
    pub language_name: String,
    /// URL the page was fetched from.
    pub url: String,
    /// Local path of the saved root page.
    pub index_path: PathBuf,
    /// Saved resources, relative to the page directory, in fetch order.
    pub resources: Vec<String>,
}

impl ArchiveRecord {
    /// A record is only usable while its saved page is still on disk.
    pub fn is_valid(&self) -> bool {
        self.index_path.is_file()
    }

    /// Directory holding `index_path` and every resource.
    pub fn page_dir(&self) -> &Path {
        self.index_path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// All known records keyed by display name. Iteration order is the catalog order.
pub type ArchiveMap = BTreeMap<String, ArchiveRecord>;

/// True if `data` holds a record for `name` whose page still exists.
pub fn has_valid(data: &ArchiveMap, name: &str) -> bool {
    data.get(name).map(ArchiveRecord::is_valid).unwrap_or(false)
}

/// JSON file backing the archive map.
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    path: PathBuf,
}

impl ArchiveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store; a missing file is an empty map.
    pub fn load(&self) -> Result<ArchiveMap> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ArchiveMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read archive store: {}", self.path.display()))
            }
        };
        let mut data: ArchiveMap = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse archive store: {}", self.path.display()))?;
        for (name, record) in data.iter_mut() {
            record.language_name = name.clone();
        }
        tracing::debug!("loaded {} archive records from {}", data.len(), self.path.display());
        Ok(data)
    }

    /// Replace the store with `data` (write-then-rename, never partial).
    pub fn save(&self, data: &ArchiveMap) -> Result<()> {
        let json = serde_json::to_vec_pretty(data).context("serialize archive store")?;
        storage::write_atomic(&self.path, &json)
            .with_context(|| format!("write archive store: {}", self.path.display()))?;
        tracing::debug!("saved {} archive records to {}", data.len(), self.path.display());
        Ok(())
    }
}
