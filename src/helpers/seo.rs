//! SEO head-tag generation
//!
//! Every rendered page gets the same fixed block of tags: document title,
//! meta description, canonical link and the Open Graph set. Error pages use
//! the generic fallback derived from the site configuration.

use crate::config::SiteConfig;
use crate::helpers::{full_url_for, html_escape};

/// The title/description/URL triple a page head is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoTags {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl SeoTags {
    pub fn new(title: impl Into<String>, description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
        }
    }

    /// Generic tags used when a page cannot be resolved
    pub fn fallback(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            url: full_url_for(config, "/"),
        }
    }

    /// Render the fixed head block
    pub fn render(&self, config: &SiteConfig) -> String {
        let title = html_escape(&self.title);
        let description = html_escape(&self.description);
        let site_name = html_escape(&config.title);

        let mut tags = vec![
            format!("<title>{}</title>", title),
            format!(r#"<meta name="description" content="{}">"#, description),
            format!(r#"<link rel="canonical" href="{}">"#, self.url),
            r#"<meta property="og:type" content="website">"#.to_string(),
            format!(r#"<meta property="og:title" content="{}">"#, title),
            format!(r#"<meta property="og:url" content="{}">"#, self.url),
            format!(r#"<meta property="og:site_name" content="{}">"#, site_name),
        ];

        if !description.is_empty() {
            tags.push(format!(
                r#"<meta property="og:description" content="{}">"#,
                description
            ));
        }

        tags.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_fixed_set() {
        let config = SiteConfig::default();
        let tags = SeoTags::new("A Post", "About something", "https://example.com/posts/a-post/");
        let html = tags.render(&config);

        assert!(html.contains("<title>A Post</title>"));
        assert!(html.contains(r#"<meta name="description" content="About something">"#));
        assert!(html.contains(r#"<link rel="canonical" href="https://example.com/posts/a-post/">"#));
        assert!(html.contains(r#"<meta property="og:title" content="A Post">"#));
        assert!(html.contains(r#"<meta property="og:url""#));
    }

    #[test]
    fn test_escapes_content() {
        let config = SiteConfig::default();
        let tags = SeoTags::new(r#"Tags & "quotes""#, "", "https://example.com/");
        let html = tags.render(&config);
        assert!(html.contains("Tags &amp; &quot;quotes&quot;"));
    }

    #[test]
    fn test_fallback_uses_site_config() {
        let config = SiteConfig {
            title: "My Journal".to_string(),
            description: "Notes".to_string(),
            url: "https://journal.example".to_string(),
            ..SiteConfig::default()
        };
        let tags = SeoTags::fallback(&config);
        assert_eq!(tags.title, "My Journal");
        assert_eq!(tags.url, "https://journal.example/");
    }

    #[test]
    fn test_fallback_respects_site_root() {
        let config = SiteConfig {
            url: "https://journal.example".to_string(),
            root: "/journal/".to_string(),
            ..SiteConfig::default()
        };
        let tags = SeoTags::fallback(&config);
        assert_eq!(tags.url, "https://journal.example/journal/");
    }

    #[test]
    fn test_empty_description_omits_og_description() {
        let config = SiteConfig::default();
        let html = SeoTags::new("T", "", "https://example.com/").render(&config);
        assert!(!html.contains("og:description"));
    }
}
