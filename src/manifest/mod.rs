//! Post manifest - the JSON index of all posts
//!
//! The manifest (`posts.json`) is a flat array of post records. It is the
//! single source of truth for what appears on the index page; the markdown
//! files themselves are only consulted when a post is rendered.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or saving the manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Metadata for a single post, as listed in the manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostMeta {
    /// URL-safe identifier, maps to `posts/{slug}.md`
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date (ISO format in the JSON)
    pub date: NaiveDate,

    /// Short preview text shown on the index page
    pub excerpt: String,
}

/// The loaded post manifest, sorted newest first
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    posts: Vec<PostMeta>,
}

impl Manifest {
    /// Load the manifest from disk and sort it by date descending
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut posts: Vec<PostMeta> = serde_json::from_str(&content)?;

        // Sort by date descending (newest first)
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(Self { posts })
    }

    /// Save the manifest back to disk as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ManifestError> {
        let json = serde_json::to_string_pretty(&self.posts)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Create a manifest from already-known entries (sorted on insert)
    pub fn from_posts(mut posts: Vec<PostMeta>) -> Self {
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Self { posts }
    }

    /// All posts, newest first
    pub fn posts(&self) -> &[PostMeta] {
        &self.posts
    }

    /// Number of posts in the manifest
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the manifest is empty
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Look up a post by slug
    pub fn find(&self, slug: &str) -> Option<&PostMeta> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Register a new post, keeping the newest-first order
    pub fn add(&mut self, meta: PostMeta) {
        self.posts.push(meta);
        self.posts.sort_by(|a, b| b.date.cmp(&a.date));
    }
}
