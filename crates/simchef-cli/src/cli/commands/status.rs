//! `simchef status` – show archive store records.

use anyhow::Result;
use simchef_core::chef::Chef;
use simchef_core::http::HttpClient;

pub fn run_status<C: HttpClient>(chef: &Chef<C>) -> Result<()> {
    let data = chef.store().load()?;
    if data.is_empty() {
        println!("No languages in {}.", chef.paths().archive_data.display());
        return Ok(());
    }
    println!("{:<16} {:<8} {:<6} {}", "LANGUAGE", "STATE", "FILES", "URL");
    for (name, record) in &data {
        let state = if record.is_valid() { "ok" } else { "missing" };
        println!(
            "{:<16} {:<8} {:<6} {}",
            name,
            state,
            record.resources.len(),
            record.url
        );
    }
    Ok(())
}
