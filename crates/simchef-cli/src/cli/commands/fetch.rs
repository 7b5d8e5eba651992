//! `simchef fetch` – download phase only.

use anyhow::Result;
use simchef_core::chef::Chef;
use simchef_core::http::HttpClient;

pub fn run_fetch<C: HttpClient>(chef: &Chef<C>) -> Result<()> {
    let data = chef.download_content()?;
    println!(
        "{} languages in {}",
        data.len(),
        chef.paths().archive_data.display()
    );
    Ok(())
}
