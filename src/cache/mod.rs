//! Cache module for incremental generation
//!
//! Tracks content hashes of the config, the manifest and each markdown post
//! so unchanged sites skip regeneration and edits rebuild only the touched
//! post pages (plus the index, which depends on the whole manifest).

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use walkdir::WalkDir;

use crate::manifest::Manifest;
use crate::Site;

/// Cache file name
const CACHE_FILE: &str = ".fieldnotes-cache/db.json";

/// Cache database for tracking content changes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Hash of the site config
    pub config_hash: u64,
    /// Hash of the raw manifest file
    pub manifest_hash: u64,
    /// Combined hash of every file under the static directory
    pub static_hash: u64,
    /// Markdown content hashes, keyed by slug
    pub posts: HashMap<String, u64>,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or create a new empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, rebuilding cache");
            }
        }
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// Whether any cached state exists
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty() && self.manifest_hash == 0
    }
}

/// Change detection result
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Slugs whose markdown changed
    pub changed_posts: Vec<String>,
    /// Whether the manifest itself changed (index pages depend on it)
    pub manifest_changed: bool,
    /// Whether any file under the static directory changed
    pub static_changed: bool,
    /// Whether to regenerate everything (config changed, cache empty)
    pub full_rebuild: bool,
}

impl ChangeSet {
    pub fn full_rebuild() -> Self {
        Self {
            changed_posts: Vec::new(),
            manifest_changed: true,
            static_changed: true,
            full_rebuild: true,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.full_rebuild
            || self.manifest_changed
            || self.static_changed
            || !self.changed_posts.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.full_rebuild {
            "full rebuild".to_string()
        } else {
            format!(
                "{} changed post(s), manifest_changed={}, static_changed={}",
                self.changed_posts.len(),
                self.manifest_changed,
                self.static_changed
            )
        }
    }
}

/// Hash arbitrary content
pub fn hash_content(content: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Combined hash of every file under a directory, keyed by relative path
fn hash_dir(dir: &Path) -> u64 {
    let mut entries: Vec<(String, u64)> = Vec::new();

    if dir.exists() {
        for entry in WalkDir::new(dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let (Ok(relative), Ok(content)) = (path.strip_prefix(dir), fs::read(path)) {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                content.hash(&mut hasher);
                entries.push((relative.to_string_lossy().into_owned(), hasher.finish()));
            }
        }
    }

    // Stable order regardless of directory walk order
    entries.sort();
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    entries.hash(&mut hasher);
    hasher.finish()
}

/// Build the cache state for the current site content
pub fn snapshot(site: &Site, manifest: &Manifest) -> CacheDb {
    let config_hash = serde_yaml::to_string(&site.config)
        .map(|s| hash_content(&s))
        .unwrap_or_default();

    let manifest_hash = fs::read_to_string(site.manifest_path())
        .map(|s| hash_content(&s))
        .unwrap_or_default();

    let static_hash = hash_dir(&site.static_dir);

    let mut posts = HashMap::new();
    for meta in manifest.posts() {
        let path = site.posts_dir.join(format!("{}.md", meta.slug));
        if let Ok(content) = fs::read_to_string(&path) {
            posts.insert(meta.slug.clone(), hash_content(&content));
        }
    }

    CacheDb {
        version: CacheDb::VERSION,
        config_hash,
        manifest_hash,
        static_hash,
        posts,
    }
}

/// Compare the previous cache against the current snapshot
pub fn detect_changes(previous: &CacheDb, current: &CacheDb) -> ChangeSet {
    if previous.is_empty() || previous.config_hash != current.config_hash {
        return ChangeSet::full_rebuild();
    }

    let mut changed_posts = Vec::new();
    for (slug, hash) in &current.posts {
        if previous.posts.get(slug) != Some(hash) {
            changed_posts.push(slug.clone());
        }
    }

    ChangeSet {
        changed_posts,
        manifest_changed: previous.manifest_hash != current.manifest_hash,
        static_changed: previous.static_hash != current.static_hash,
        full_rebuild: false,
    }
}
