//! Generator module - renders pages and writes the static site
//!
//! `PageRenderer` produces the HTML for the three views (index, post, error)
//! and is shared between the static generator and the preview server, so both
//! surfaces go through the same pagination, search and SEO paths.

use anyhow::Result;
use std::fs;
use tera::Context;
use walkdir::WalkDir;

use crate::content::{Article, ArticleError, ArticleLoader, MarkdownRenderer};
use crate::helpers::{self, format_date, SeoTags};
use crate::listing::ListState;
use crate::manifest::{Manifest, PostMeta};
use crate::templates::{
    CardData, ConfigData, PaginationData, TemplateRenderer, REVEAL_JS, SEARCH_JS, STYLE_CSS,
};
use crate::Site;

/// Renders the journal views from site content
pub struct PageRenderer {
    site: Site,
    templates: TemplateRenderer,
    loader: ArticleLoader,
}

impl PageRenderer {
    pub fn new(site: &Site) -> Result<Self> {
        let templates = TemplateRenderer::new()?;
        let renderer = MarkdownRenderer::with_options(
            &site.config.highlight.theme,
            site.config.highlight.enable,
            site.config.highlight.line_number,
        );
        let loader = ArticleLoader::new(&site.posts_dir, renderer, site.config.excerpt_length);

        Ok(Self {
            site: site.clone(),
            templates,
            loader,
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Common context shared by every view
    fn base_context(&self, seo: &SeoTags) -> Context {
        let config = &self.site.config;
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: config.title.clone(),
                description: config.description.clone(),
                author: config.author.clone(),
                language: config.language.clone(),
                url: config.url.clone(),
                root: config.root.clone(),
            },
        );
        context.insert("seo_tags", &seo.render(config));
        context.insert("css_url", &helpers::url_for(config, "css/style.css"));
        context.insert("scroll_reveal", &config.scroll_reveal);
        context.insert("reveal_js_url", &helpers::url_for(config, "js/reveal.js"));
        context.insert(
            "current_year",
            &chrono::Local::now().format("%Y").to_string(),
        );
        context
    }

    /// Render one index page from the list controller state. Prev/next links
    /// are caller-supplied because the static site and the preview server
    /// address pages differently.
    pub fn render_index(
        &self,
        state: &ListState,
        prev_link: &str,
        next_link: &str,
        canonical: &str,
    ) -> Result<String> {
        let config = &self.site.config;

        let cards: Vec<CardData> = state
            .current_cards()
            .iter()
            .map(|p| self.card(p))
            .collect();

        let pagination = PaginationData {
            current: state.page(),
            total: state.total_pages(),
            has_prev: state.has_prev(),
            has_next: state.has_next(),
            prev_link: prev_link.to_string(),
            next_link: next_link.to_string(),
            label: state.page_label(),
        };

        let seo = SeoTags::new(
            config.title.clone(),
            config.description.clone(),
            canonical.to_string(),
        );

        let mut context = self.base_context(&seo);
        context.insert("cards", &cards);
        context.insert("pagination", &pagination);
        context.insert("search_query", &helpers::html_escape(state.query()));
        context.insert("search_js_url", &helpers::url_for(config, "js/search.js"));
        context.insert("manifest_url", &helpers::url_for(config, &config.manifest));
        context.insert("post_base", &helpers::url_for(config, "posts/"));
        context.insert("per_page", &config.per_page);

        self.templates.render("index.html", &context)
    }

    /// Load and render a single post page
    pub fn render_post(&self, slug: &str, meta: Option<&PostMeta>) -> Result<String, ArticleError> {
        let article = self.loader.load(slug)?;
        self.render_article(&article, meta)
            .map_err(|source| ArticleError::Render {
                slug: slug.to_string(),
                source,
            })
    }

    fn render_article(&self, article: &Article, meta: Option<&PostMeta>) -> Result<String> {
        let config = &self.site.config;

        // Prefer the excerpt derived from the body; fall back to the manifest
        let description = if article.excerpt.is_empty() {
            meta.map(|m| m.excerpt.clone()).unwrap_or_default()
        } else {
            article.excerpt.clone()
        };

        let seo = SeoTags::new(
            article.title.clone(),
            description,
            helpers::full_post_url(config, &article.slug),
        );

        let date = meta
            .map(|m| format_date(&m.date, &config.date_format))
            .unwrap_or_default();

        let mut context = self.base_context(&seo);
        context.insert("post_title", &helpers::html_escape(&article.title));
        context.insert("post_date", &date);
        context.insert("post_html", &article.html);

        self.templates.render("post.html", &context)
    }

    /// Render the inline error view with the generic SEO fallback
    pub fn render_error(&self, message: &str) -> Result<String> {
        let seo = SeoTags::fallback(&self.site.config);
        let mut context = self.base_context(&seo);
        context.insert("message", &helpers::html_escape(message));
        self.templates.render("error.html", &context)
    }

    fn card(&self, meta: &PostMeta) -> CardData {
        let config = &self.site.config;
        CardData {
            slug: meta.slug.clone(),
            title: helpers::html_escape(&meta.title),
            date: format_date(&meta.date, &config.date_format),
            excerpt: helpers::html_escape(&meta.excerpt),
            url: helpers::post_url(config, &meta.slug),
        }
    }
}

/// Static site generator
pub struct Generator {
    renderer: PageRenderer,
}

impl Generator {
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            renderer: PageRenderer::new(site)?,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, manifest: &Manifest) -> Result<()> {
        let site = self.renderer.site().clone();
        fs::create_dir_all(&site.public_dir)?;

        self.write_assets()?;
        self.write_manifest(manifest)?;
        self.generate_index_pages(manifest)?;
        self.generate_post_pages(manifest, None)?;
        self.copy_static_files()?;

        Ok(())
    }

    /// Regenerate only the given slugs plus the index pages
    pub fn generate_incremental(
        &self,
        manifest: &Manifest,
        changed: &[String],
        statics_changed: bool,
    ) -> Result<()> {
        let site = self.renderer.site().clone();
        fs::create_dir_all(&site.public_dir)?;

        self.write_assets()?;
        self.write_manifest(manifest)?;
        self.generate_index_pages(manifest)?;
        self.generate_post_pages(manifest, Some(changed))?;
        if statics_changed {
            self.copy_static_files()?;
        }

        Ok(())
    }

    /// Generate index.html plus page/N/index.html for every page
    fn generate_index_pages(&self, manifest: &Manifest) -> Result<()> {
        let site = self.renderer.site();
        let config = &site.config;

        let mut state = ListState::new(manifest.posts().to_vec(), config.per_page);
        let total_pages = state.total_pages().max(1);

        for page_num in 1..=total_pages {
            state.set_page(page_num);

            let prev_link = if state.has_prev() {
                helpers::index_url(config, page_num - 1)
            } else {
                String::new()
            };
            let next_link = if state.has_next() {
                helpers::index_url(config, page_num + 1)
            } else {
                String::new()
            };
            let canonical = helpers::full_index_url(config, page_num);

            let html = self
                .renderer
                .render_index(&state, &prev_link, &next_link, &canonical)?;

            let output_path = if page_num == 1 {
                site.public_dir.join("index.html")
            } else {
                site.public_dir
                    .join(&config.pagination_dir)
                    .join(page_num.to_string())
                    .join("index.html")
            };

            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            tracing::debug!("Generated: {:?}", output_path);
        }

        tracing::info!("Generated {} index page(s)", total_pages);
        Ok(())
    }

    /// Generate individual post pages; `only` restricts to a set of slugs
    fn generate_post_pages(&self, manifest: &Manifest, only: Option<&[String]>) -> Result<()> {
        let site = self.renderer.site();
        let mut generated = 0;

        for meta in manifest.posts() {
            if let Some(only) = only {
                if !only.iter().any(|s| s == &meta.slug) {
                    continue;
                }
            }

            let html = match self.renderer.render_post(&meta.slug, Some(meta)) {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!("Skipping post {}: {}", meta.slug, e);
                    continue;
                }
            };

            let output_path = site
                .public_dir
                .join("posts")
                .join(&meta.slug)
                .join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            generated += 1;
            tracing::debug!("Generated post: {}", meta.slug);
        }

        tracing::info!("Generated {} post page(s)", generated);
        Ok(())
    }

    /// Publish the sorted manifest for client-side search
    fn write_manifest(&self, manifest: &Manifest) -> Result<()> {
        let site = self.renderer.site();
        let output_path = site.public_dir.join(&site.config.manifest);
        let json = serde_json::to_string_pretty(manifest.posts())?;
        fs::write(output_path, json)?;
        Ok(())
    }

    /// Write the embedded CSS/JS assets
    fn write_assets(&self) -> Result<()> {
        let site = self.renderer.site();

        let css_dir = site.public_dir.join("css");
        fs::create_dir_all(&css_dir)?;
        fs::write(css_dir.join("style.css"), STYLE_CSS)?;

        let js_dir = site.public_dir.join("js");
        fs::create_dir_all(&js_dir)?;
        fs::write(js_dir.join("search.js"), SEARCH_JS)?;

        if site.config.scroll_reveal {
            fs::write(js_dir.join("reveal.js"), REVEAL_JS)?;
        }

        Ok(())
    }

    /// Copy files from the static directory into public/
    fn copy_static_files(&self) -> Result<()> {
        let site = self.renderer.site();
        if !site.static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(&site.static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                let relative = path.strip_prefix(&site.static_dir)?;
                let dest = site.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::path::Path;

    fn site_with_posts(dir: &Path, posts: &[(&str, &str, &str)]) -> (Site, Manifest) {
        fs::create_dir_all(dir.join("posts")).unwrap();

        let mut metas = Vec::new();
        for (slug, date, body) in posts {
            fs::write(dir.join("posts").join(format!("{}.md", slug)), body).unwrap();
            metas.push(PostMeta {
                slug: slug.to_string(),
                title: slug.to_string(),
                date: date.parse().unwrap(),
                excerpt: "an excerpt".to_string(),
            });
        }

        let site = Site {
            config: SiteConfig {
                highlight: crate::config::HighlightConfig {
                    enable: false,
                    ..Default::default()
                },
                ..SiteConfig::default()
            },
            base_dir: dir.to_path_buf(),
            posts_dir: dir.join("posts"),
            public_dir: dir.join("public"),
            static_dir: dir.join("static"),
        };
        (site, Manifest::from_posts(metas))
    }

    #[test]
    fn test_generate_writes_expected_files() {
        let dir = tempfile::tempdir().unwrap();
        let (site, manifest) = site_with_posts(
            dir.path(),
            &[
                ("alpha", "2024-06-01", "# Alpha\n\nBody of alpha.\n"),
                ("beta", "2024-01-01", "# Beta\n\nBody of beta.\n"),
            ],
        );

        Generator::new(&site).unwrap().generate(&manifest).unwrap();

        assert!(site.public_dir.join("index.html").exists());
        assert!(site.public_dir.join("posts/alpha/index.html").exists());
        assert!(site.public_dir.join("posts/beta/index.html").exists());
        assert!(site.public_dir.join("posts.json").exists());
        assert!(site.public_dir.join("css/style.css").exists());
        assert!(site.public_dir.join("js/search.js").exists());

        // Newest post comes first on the index page
        let index = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        let alpha_pos = index.find("/posts/alpha/").unwrap();
        let beta_pos = index.find("/posts/beta/").unwrap();
        assert!(alpha_pos < beta_pos);
    }

    #[test]
    fn test_generate_paginates() {
        let dir = tempfile::tempdir().unwrap();
        let posts: Vec<(String, String)> = (0..13)
            .map(|i| (format!("post-{:02}", i), format!("# Post {}\n\nBody.\n", i)))
            .collect();
        let entries: Vec<(&str, &str, &str)> = posts
            .iter()
            .map(|(slug, body)| (slug.as_str(), "2024-01-01", body.as_str()))
            .collect();
        let (site, manifest) = site_with_posts(dir.path(), &entries);

        Generator::new(&site).unwrap().generate(&manifest).unwrap();

        assert!(site.public_dir.join("index.html").exists());
        assert!(site.public_dir.join("page/2/index.html").exists());
        assert!(!site.public_dir.join("page/3/index.html").exists());

        let page2 = fs::read_to_string(site.public_dir.join("page/2/index.html")).unwrap();
        assert!(page2.contains("Page 2 of 2"));
        // Each page carries its own canonical URL
        assert!(page2.contains(r#"<link rel="canonical" href="http://example.com/page/2/">"#));
    }

    #[test]
    fn test_generate_empty_manifest_shows_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let (site, manifest) = site_with_posts(dir.path(), &[]);

        Generator::new(&site).unwrap().generate(&manifest).unwrap();

        let index = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        assert!(index.contains("No posts found"));
        assert!(!index.contains(r#"id="prev-page""#));
    }

    #[test]
    fn test_generate_skips_missing_markdown() {
        let dir = tempfile::tempdir().unwrap();
        let (site, mut manifest) =
            site_with_posts(dir.path(), &[("real", "2024-01-01", "# Real\n\nBody.\n")]);
        manifest.add(PostMeta {
            slug: "ghost".to_string(),
            title: "Ghost".to_string(),
            date: "2024-02-01".parse().unwrap(),
            excerpt: String::new(),
        });

        Generator::new(&site).unwrap().generate(&manifest).unwrap();

        assert!(site.public_dir.join("posts/real/index.html").exists());
        assert!(!site.public_dir.join("posts/ghost/index.html").exists());
    }

    #[test]
    fn test_missing_slug_renders_error_page() {
        let dir = tempfile::tempdir().unwrap();
        let (site, _) = site_with_posts(dir.path(), &[]);

        let renderer = PageRenderer::new(&site).unwrap();
        let err = renderer.render_post("does-not-exist", None).unwrap_err();
        assert!(matches!(err, ArticleError::NotFound(_)));

        let html = renderer.render_error("Post not found.").unwrap();
        assert!(html.contains("Post not found."));
        // Generic SEO fallback, not the post title
        assert!(html.contains(&format!("<title>{}</title>", site.config.title)));
    }

    #[test]
    fn test_post_page_has_seo_tags() {
        let dir = tempfile::tempdir().unwrap();
        let (site, manifest) = site_with_posts(
            dir.path(),
            &[("notes", "2024-03-05", "# Station Notes\n\nA quiet day on the ridge.\n")],
        );

        let renderer = PageRenderer::new(&site).unwrap();
        let html = renderer
            .render_post("notes", manifest.find("notes"))
            .unwrap();

        assert!(html.contains("<title>Station Notes</title>"));
        assert!(html.contains(r#"content="A quiet day on the ridge.""#));
        assert!(html.contains(r#"rel="canonical""#));
        assert!(html.contains("2024-03-05"));
    }
}
