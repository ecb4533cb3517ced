//! Create a new post and register it in the manifest

use anyhow::Result;
use chrono::Local;
use std::fs;

use crate::manifest::{Manifest, PostMeta};
use crate::Site;

/// Create a new post markdown file and its manifest entry
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<()> {
    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Could not derive a slug from title: {:?}", title);
    }

    fs::create_dir_all(&site.posts_dir)?;
    let file_path = site.posts_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let manifest_path = site.manifest_path();
    let mut manifest = if manifest_path.exists() {
        Manifest::load(&manifest_path)?
    } else {
        Manifest::default()
    };
    if manifest.find(&slug).is_some() {
        anyhow::bail!("Manifest already contains slug: {}", slug);
    }

    let content = format!("# {}\n\nWrite your post here.\n", title);
    fs::write(&file_path, content)?;

    manifest.add(PostMeta {
        slug: slug.clone(),
        title: title.to_string(),
        date: Local::now().date_naive(),
        excerpt: String::new(),
    });
    manifest.save(&manifest_path)?;

    println!("Created: {:?}", file_path);
    println!("Registered {} in {:?}", slug, manifest_path);

    Ok(())
}

/// Run the new command
pub fn run(site: &Site, title: &str) -> Result<()> {
    create_post(site, title, None)
}
