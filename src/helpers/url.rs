//! URL helper functions

use crate::config::SiteConfig;

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/journal/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// URL of a post page for the given slug
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    url_for(config, &format!("posts/{}/", encode_url(slug)))
}

/// URL of an index page; page 1 is the site root
pub fn index_url(config: &SiteConfig, page: usize) -> String {
    if page <= 1 {
        url_for(config, "")
    } else {
        url_for(config, &format!("{}/{}/", config.pagination_dir, page))
    }
}

/// Absolute URL of a post page, domain included
pub fn full_post_url(config: &SiteConfig, slug: &str) -> String {
    full_url_for(config, &format!("posts/{}/", encode_url(slug)))
}

/// Absolute URL of an index page, domain included
pub fn full_index_url(config: &SiteConfig, page: usize) -> String {
    if page <= 1 {
        full_url_for(config, "")
    } else {
        full_url_for(config, &format!("{}/{}/", config.pagination_dir, page))
    }
}

/// Percent-encode a URL path segment
pub fn encode_url(path: &str) -> String {
    // Keep unreserved characters and hyphens readable in slugs
    const SEGMENT: &percent_encoding::AsciiSet = &percent_encoding::NON_ALPHANUMERIC
        .remove(b'-')
        .remove(b'_')
        .remove(b'.');
    percent_encoding::utf8_percent_encode(path, SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            root: "/journal/".to_string(),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/journal/css/style.css");
        assert_eq!(url_for(&config, ""), "/journal/");
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/posts/hello/"),
            "https://example.com/journal/posts/hello/"
        );
    }

    #[test]
    fn test_post_url() {
        let config = test_config();
        assert_eq!(post_url(&config, "hello-world"), "/journal/posts/hello-world/");
    }

    #[test]
    fn test_index_url() {
        let config = test_config();
        assert_eq!(index_url(&config, 1), "/journal/");
        assert_eq!(index_url(&config, 3), "/journal/page/3/");
    }

    #[test]
    fn test_full_urls_apply_root_once() {
        let config = test_config();
        assert_eq!(
            full_post_url(&config, "hello-world"),
            "https://example.com/journal/posts/hello-world/"
        );
        assert_eq!(full_index_url(&config, 1), "https://example.com/journal/");
        assert_eq!(
            full_index_url(&config, 2),
            "https://example.com/journal/page/2/"
        );
    }
}
