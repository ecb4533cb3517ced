//! Built-in journal theme using the Tera template engine
//!
//! All templates and static assets are embedded in the binary, so a generated
//! site needs nothing beyond the content directory.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

/// Embedded stylesheet
pub const STYLE_CSS: &str = include_str!("assets/style.css");

/// Client-side search and repagination over the published manifest
pub const SEARCH_JS: &str = include_str!("assets/search.js");

/// IntersectionObserver scroll-reveal script
pub const REVEAL_JS: &str = include_str!("assets/reveal.js");

/// Template renderer with the embedded journal theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all journal templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping is off: post bodies and SEO blocks are already HTML,
        // and everything user-visible is escaped before it reaches a context.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("journal/layout.html")),
            ("index.html", include_str!("journal/index.html")),
            ("post.html", include_str!("journal/post.html")),
            ("error.html", include_str!("journal/error.html")),
            (
                "partials/pager.html",
                include_str!("journal/partials/pager.html"),
            ),
            (
                "partials/footer.html",
                include_str!("journal/partials/footer.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

/// One post card on the index page
#[derive(Debug, Clone, Serialize)]
pub struct CardData {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub excerpt: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub current: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_link: String,
    pub next_link: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "Journal".to_string(),
                description: "Notes".to_string(),
                author: "Tester".to_string(),
                language: "en".to_string(),
                url: "https://example.com".to_string(),
                root: "/".to_string(),
            },
        );
        context.insert("seo_tags", "<title>Journal</title>");
        context.insert("css_url", "/css/style.css");
        context.insert("current_year", "2026");
        context.insert("scroll_reveal", &false);
        context.insert("reveal_js_url", "/js/reveal.js");
        context
    }

    fn index_context(cards: Vec<CardData>, pagination: PaginationData) -> Context {
        let mut context = base_context();
        context.insert("cards", &cards);
        context.insert("pagination", &pagination);
        context.insert("search_query", "");
        context.insert("search_js_url", "/js/search.js");
        context.insert("manifest_url", "/posts.json");
        context.insert("post_base", "/posts/");
        context.insert("per_page", &10);
        context
    }

    #[test]
    fn test_render_index_with_cards() {
        let renderer = TemplateRenderer::new().unwrap();
        let context = index_context(
            vec![CardData {
                slug: "hello".to_string(),
                title: "Hello".to_string(),
                date: "2024-01-15".to_string(),
                excerpt: "First post".to_string(),
                url: "/posts/hello/".to_string(),
            }],
            PaginationData {
                current: 1,
                total: 1,
                has_prev: false,
                has_next: false,
                prev_link: String::new(),
                next_link: String::new(),
                label: "Page 1 of 1".to_string(),
            },
        );

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains(r#"id="post-list""#));
        assert!(html.contains(r#"id="search-bar""#));
        assert!(html.contains(r#"id="page-indicator""#));
        assert!(html.contains("Page 1 of 1"));
        assert!(html.contains("/posts/hello/"));
        // Placeholder exists but is hidden while there are results
        assert!(html.contains(r#"id="no-results""#));
    }

    #[test]
    fn test_render_index_empty_hides_pagination() {
        let renderer = TemplateRenderer::new().unwrap();
        let context = index_context(
            Vec::new(),
            PaginationData {
                current: 1,
                total: 0,
                has_prev: false,
                has_next: false,
                prev_link: String::new(),
                next_link: String::new(),
                label: "Page 1 of 1".to_string(),
            },
        );

        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains("No posts found"));
        assert!(!html.contains(r#"id="prev-page""#));
    }

    #[test]
    fn test_render_post() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("post_title", "Hello");
        context.insert("post_date", "2024-01-15");
        context.insert("post_html", "<p>Body</p>");

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains(r#"id="post-content""#));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn test_render_error() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = base_context();
        context.insert("message", "Post not found.");

        let html = renderer.render("error.html", &context).unwrap();
        assert!(html.contains("Post not found."));
    }
}
