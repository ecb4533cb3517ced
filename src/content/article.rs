//! Article loading - a single rendered post
//!
//! An article is a markdown file addressed by slug. Title and excerpt are
//! derived from the rendered HTML: the first `<h1>` becomes the document
//! title, the first paragraph (tags stripped, truncated) becomes the meta
//! description.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::MarkdownRenderer;
use crate::helpers::{collapse_whitespace, strip_html, truncate};

lazy_static! {
    static ref H1_RE: Regex = Regex::new(r"(?s)<h1[^>]*>(.*?)</h1>").unwrap();
    static ref P_RE: Regex = Regex::new(r"(?s)<p[^>]*>(.*?)</p>").unwrap();
}

/// Errors raised while loading an article
#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("post not found: {0}")]
    NotFound(String),

    #[error("failed to read post {slug}: {source}")]
    Io {
        slug: String,
        source: std::io::Error,
    },

    #[error("failed to render post {slug}: {source}")]
    Render {
        slug: String,
        source: anyhow::Error,
    },
}

/// A fully rendered post
#[derive(Debug, Clone)]
pub struct Article {
    /// URL-safe identifier
    pub slug: String,
    /// Title extracted from the first heading (fallback: slug)
    pub title: String,
    /// Publication date, when the manifest knows one
    pub date: Option<NaiveDate>,
    /// Rendered HTML body
    pub html: String,
    /// First paragraph, stripped and truncated, for meta tags
    pub excerpt: String,
}

/// Loads and renders articles from the posts directory
pub struct ArticleLoader {
    posts_dir: PathBuf,
    renderer: MarkdownRenderer,
    excerpt_length: usize,
}

impl ArticleLoader {
    pub fn new<P: AsRef<Path>>(posts_dir: P, renderer: MarkdownRenderer, excerpt_length: usize) -> Self {
        Self {
            posts_dir: posts_dir.as_ref().to_path_buf(),
            renderer,
            excerpt_length,
        }
    }

    /// Load `posts/{slug}.md` and render it
    pub fn load(&self, slug: &str) -> Result<Article, ArticleError> {
        // Guard against path traversal through the slug query parameter
        if slug.is_empty() || slug.contains('/') || slug.contains('\\') || slug.contains("..") {
            return Err(ArticleError::NotFound(slug.to_string()));
        }

        let path = self.posts_dir.join(format!("{}.md", slug));
        if !path.exists() {
            return Err(ArticleError::NotFound(slug.to_string()));
        }

        let markdown = fs::read_to_string(&path).map_err(|source| ArticleError::Io {
            slug: slug.to_string(),
            source,
        })?;

        let html = self
            .renderer
            .render(&markdown)
            .map_err(|source| ArticleError::Render {
                slug: slug.to_string(),
                source,
            })?;

        let title = extract_title(&html).unwrap_or_else(|| slug.to_string());
        let excerpt = extract_excerpt(&html, self.excerpt_length);

        Ok(Article {
            slug: slug.to_string(),
            title,
            date: None,
            html,
            excerpt,
        })
    }
}

/// Text of the first `<h1>` in the rendered HTML
pub fn extract_title(html: &str) -> Option<String> {
    H1_RE
        .captures(html)
        .map(|c| collapse_whitespace(&strip_html(&c[1])))
        .filter(|t| !t.is_empty())
}

/// First paragraph, tags stripped, truncated to `length` characters
pub fn extract_excerpt(html: &str, length: usize) -> String {
    P_RE.captures(html)
        .map(|c| collapse_whitespace(&strip_html(&c[1])))
        .map(|text| truncate(&text, length, None))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(dir: &Path) -> ArticleLoader {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", false, false);
        ArticleLoader::new(dir, renderer, 155)
    }

    #[test]
    fn test_load_article() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("field-report.md"),
            "# Field Report\n\nFirst day at the station. Everything nominal.\n\nSecond paragraph.\n",
        )
        .unwrap();

        let article = loader(dir.path()).load("field-report").unwrap();
        assert_eq!(article.title, "Field Report");
        assert_eq!(article.excerpt, "First day at the station. Everything nominal.");
        assert!(article.html.contains("<h1>Field Report</h1>"));
    }

    #[test]
    fn test_missing_slug() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader(dir.path()).load("nope").unwrap_err();
        assert!(matches!(err, ArticleError::NotFound(_)));
    }

    #[test]
    fn test_traversal_slug_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for slug in ["", "../etc/passwd", "a/b", "..\\x"] {
            let err = loader(dir.path()).load(slug).unwrap_err();
            assert!(matches!(err, ArticleError::NotFound(_)), "slug {:?}", slug);
        }
    }

    #[test]
    fn test_title_falls_back_to_slug() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("untitled.md"), "Just a paragraph, no heading.\n").unwrap();

        let article = loader(dir.path()).load("untitled").unwrap();
        assert_eq!(article.title, "untitled");
    }

    #[test]
    fn test_extract_title_strips_inline_tags() {
        let html = "<h1>Notes on <em>borrowing</em></h1><p>Body</p>";
        assert_eq!(extract_title(html).unwrap(), "Notes on borrowing");
    }

    #[test]
    fn test_excerpt_truncated() {
        let long = "word ".repeat(100);
        let html = format!("<p>{}</p>", long);
        let excerpt = extract_excerpt(&html, 155);
        assert!(excerpt.chars().count() <= 155);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_excerpt_empty_when_no_paragraph() {
        assert_eq!(extract_excerpt("<h1>Only a title</h1>", 155), "");
    }
}
