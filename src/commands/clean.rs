//! Clean generated output

use anyhow::Result;
use std::fs;

use crate::Site;

/// Remove the public directory and the generation cache
pub fn run(site: &Site) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Removed {:?}", site.public_dir);
    }

    let cache_dir = site.base_dir.join(".fieldnotes-cache");
    if cache_dir.exists() {
        fs::remove_dir_all(&cache_dir)?;
        tracing::info!("Cache cleared");
    }

    Ok(())
}
