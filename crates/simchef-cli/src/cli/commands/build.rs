//! `simchef build` – package the existing archive store without fetching.

use anyhow::{bail, Result};
use simchef_core::chef::Chef;
use simchef_core::http::HttpClient;

pub fn run_build<C: HttpClient>(chef: &Chef<C>) -> Result<()> {
    let data = chef.store().load()?;
    if data.is_empty() {
        bail!(
            "archive store {} is empty; run `simchef fetch` first",
            chef.paths().archive_data.display()
        );
    }
    let stale: Vec<&str> = data
        .values()
        .filter(|r| !r.is_valid())
        .map(|r| r.language_name.as_str())
        .collect();
    if !stale.is_empty() {
        bail!("pages missing on disk for: {}", stale.join(", "));
    }

    let root = chef.build(&data)?;
    println!(
        "Packaged {} languages into {}",
        root.children.len(),
        chef.paths().zip_dir.display()
    );
    Ok(())
}
