//! Initialize a new journal site

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;

use crate::Site;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("posts"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    // Create default _config.yml
    let config_content = r#"# Fieldnotes configuration

# Site
title: Fieldnotes
description: A personal journal
author: Anonymous
language: en

# URL
url: http://example.com
root: /

# Directory
posts_dir: posts
public_dir: public
static_dir: static
manifest: posts.json

# Writing
date_format: YYYY-MM-DD
excerpt_length: 155

# Index page
per_page: 10
pagination_dir: page

# Rendering
scroll_reveal: true
highlight:
  enable: true
  theme: base16-ocean.dark
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    // Create a sample post plus the manifest entry describing it
    let today = Local::now().date_naive();
    let sample_post = r#"# Hello World

Welcome to your new journal! This is your very first post. Edit
`posts/hello-world.md` to change it, or create a new one with:

```bash
$ fieldnotes new "My First Field Report"
```

Every post is a plain markdown file listed in `posts.json`. Run
`fieldnotes server` to preview the site, and `fieldnotes generate` to
build the static files into `public/`.
"#;

    fs::write(target_dir.join("posts/hello-world.md"), sample_post)?;

    let manifest = format!(
        r#"[
  {{
    "slug": "hello-world",
    "title": "Hello World",
    "date": "{}",
    "excerpt": "Welcome to your new journal! This is your very first post."
  }}
]
"#,
        today.format("%Y-%m-%d")
    );

    fs::write(target_dir.join("posts.json"), manifest)?;

    Ok(())
}

/// Run the init command with an existing Site instance
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;

    #[test]
    fn test_init_site_scaffolds_content() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("_config.yml").exists());
        assert!(dir.path().join("posts/hello-world.md").exists());

        let manifest = Manifest::load(dir.path().join("posts.json")).unwrap();
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.posts()[0].slug, "hello-world");
    }
}
