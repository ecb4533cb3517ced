//! List the posts registered in the manifest

use anyhow::Result;

use crate::manifest::Manifest;
use crate::Site;

/// Print the manifest contents, newest first
pub fn run(site: &Site) -> Result<()> {
    let manifest = Manifest::load(site.manifest_path())?;

    println!("Posts ({}):", manifest.len());
    for post in manifest.posts() {
        let marker = if site.posts_dir.join(format!("{}.md", post.slug)).exists() {
            ' '
        } else {
            '!'
        };
        println!("{} {} - {} [{}]", marker, post.date, post.title, post.slug);
    }

    Ok(())
}
