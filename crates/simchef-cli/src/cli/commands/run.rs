//! `simchef run` – fetch, package and write the tree.

use anyhow::Result;
use simchef_core::chef::Chef;
use simchef_core::http::HttpClient;

pub fn run_pipeline<C: HttpClient>(chef: &Chef<C>) -> Result<()> {
    let root = chef.run()?;
    println!(
        "Packaged {} languages into {}",
        root.children.len(),
        chef.paths().zip_dir.display()
    );
    println!("Wrote {}", chef.paths().channel_json.display());
    Ok(())
}
