//! Deterministic zip archives.
//!
//! Entry order, timestamps, permissions and compression settings are all
//! fixed, so the bytes of an archive depend only on the relative paths and
//! contents of the files that went into it.

use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::sanitize::sanitize_component;
use crate::storage;

const COMPRESSION_LEVEL: i64 = 6;
const FILE_MODE: u32 = 0o644;

/// `<stem>.zip` with the stem made safe for a single path component.
pub fn archive_name(stem: &str) -> String {
    format!("{}.zip", sanitize_component(stem))
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL))
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(FILE_MODE)
}

/// Regular files under `dir` as (`/`-separated relative path, absolute path), sorted by relative path.
fn collect_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.with_context(|| format!("walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .with_context(|| format!("{} is not under {}", entry.path().display(), dir.display()))?;
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        files.push((name, entry.into_path()));
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

/// Zips every regular file under `dir` into a staging file inside `staging_dir`.
/// Returns the staging path; see [`relocate`].
pub fn create_predictable_zip(dir: &Path, staging_dir: &Path) -> Result<PathBuf> {
    let stem = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".to_string());
    std::fs::create_dir_all(staging_dir)
        .with_context(|| format!("create dir: {}", staging_dir.display()))?;
    let staged = storage::temp_path(&staging_dir.join(archive_name(&stem)));

    let files = collect_files(dir)?;
    let out = File::create(&staged).with_context(|| format!("create {}", staged.display()))?;
    let mut zip = ZipWriter::new(out);
    for (name, path) in &files {
        zip.start_file(name.as_str(), entry_options())
            .with_context(|| format!("add {} to archive", name))?;
        let mut src = File::open(path).with_context(|| format!("open {}", path.display()))?;
        io::copy(&mut src, &mut zip).with_context(|| format!("compress {}", path.display()))?;
    }
    let out = zip.finish().context("finish archive")?;
    out.sync_all().context("storage sync failed")?;

    tracing::debug!("zipped {} files from {}", files.len(), dir.display());
    Ok(staged)
}

/// Moves a staged archive to `dest`, creating the parent directory and
/// replacing whatever was there.
pub fn relocate(staged: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir: {}", parent.display()))?;
    }
    storage::replace_file(staged, dest)
}
