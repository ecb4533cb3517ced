//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub posts_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    /// Manifest file listing all posts
    pub manifest: String,

    // Writing
    pub date_format: String,
    /// Maximum character length of generated excerpts
    pub excerpt_length: usize,

    // Index page
    pub per_page: usize,
    pub pagination_dir: String,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    /// Reveal post cards as they scroll into the viewport
    pub scroll_reveal: bool,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Fieldnotes".to_string(),
            description: "A personal journal".to_string(),
            author: "Anonymous".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            posts_dir: "posts".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            manifest: "posts.json".to_string(),

            date_format: "YYYY-MM-DD".to_string(),
            excerpt_length: 155,

            per_page: 10,
            pagination_dir: "page".to_string(),

            highlight: HighlightConfig::default(),
            scroll_reveal: true,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
