//! File lifecycle helpers.
//!
//! Every file the pipeline replaces (store, rewritten pages, output tree) is
//! written to a `.part` sibling, synced, then renamed over the target so a
//! crash never leaves a half-written file behind.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `downloads.json` → `downloads.json.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Write `data` to `path` atomically: write + fsync the `.part` file, then rename.
/// Creates the parent directory if needed.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
    }
    let tmp = temp_path(path);
    {
        let mut file = File::create(&tmp)
            .with_context(|| format!("failed to create temp file: {}", tmp.display()))?;
        file.write_all(data)
            .with_context(|| format!("write {}", tmp.display()))?;
        file.sync_all().context("storage sync failed")?;
    }
    replace_file(&tmp, path)
}

/// Move `from` to `to`, replacing anything already at `to`.
/// Both paths must be on the same filesystem.
pub fn replace_file(from: &Path, to: &Path) -> Result<()> {
    if to.exists() && cfg!(windows) {
        std::fs::remove_file(to).with_context(|| format!("remove {}", to.display()))?;
    }
    std::fs::rename(from, to)
        .with_context(|| format!("failed to rename {} to {}", from.display(), to.display()))?;
    Ok(())
}
