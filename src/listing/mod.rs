//! Index listing - pagination and search over the post manifest
//!
//! `ListState` is the controller behind both the preview server's index route
//! and the static index generator: it holds the full post list, the current
//! search-narrowed list, and a 1-indexed page cursor clamped to the bounds of
//! the narrowed list.

use crate::manifest::PostMeta;

/// Pagination over a fixed number of items
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub total: usize,
    pub per_page: usize,
}

impl Paginator {
    pub fn new(total: usize, per_page: usize) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    /// Total number of pages; zero when there are no items
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page)
    }

    /// Clamp a requested page number to the valid range
    pub fn clamp(&self, page: usize) -> usize {
        page.max(1).min(self.total_pages().max(1))
    }

    /// Item index range for the given page
    pub fn slice(&self, page: usize) -> std::ops::Range<usize> {
        let page = self.clamp(page);
        let start = (page - 1) * self.per_page;
        let end = (start + self.per_page).min(self.total);
        start.min(self.total)..end
    }
}

/// Controller state for the index view
#[derive(Debug, Clone)]
pub struct ListState {
    all: Vec<PostMeta>,
    filtered: Vec<PostMeta>,
    page: usize,
    per_page: usize,
    query: String,
}

impl ListState {
    /// Create a new list over all posts, cursor on page 1
    pub fn new(all: Vec<PostMeta>, per_page: usize) -> Self {
        let filtered = all.clone();
        Self {
            all,
            filtered,
            page: 1,
            per_page: per_page.max(1),
            query: String::new(),
        }
    }

    /// Apply a free-text search: case-insensitive substring containment
    /// against title and excerpt. Resets the cursor to page 1.
    pub fn search(&mut self, query: &str) {
        let trimmed = query.trim();
        let needle = trimmed.to_lowercase();
        self.filtered = if needle.is_empty() {
            self.all.clone()
        } else {
            self.all
                .iter()
                .filter(|p| {
                    p.title.to_lowercase().contains(&needle)
                        || p.excerpt.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect()
        };
        self.query = trimmed.to_string();
        self.page = 1;
    }

    /// Move the cursor, clamped to `[1, total_pages]`
    pub fn set_page(&mut self, page: usize) {
        self.page = self.paginator().clamp(page);
    }

    fn paginator(&self) -> Paginator {
        Paginator::new(self.filtered.len(), self.per_page)
    }

    /// The search-narrowed posts
    pub fn filtered(&self) -> &[PostMeta] {
        &self.filtered
    }

    /// The active search query as typed (trimmed), empty when unfiltered
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current page cursor (1-indexed)
    pub fn page(&self) -> usize {
        self.page
    }

    /// Total number of pages in the narrowed list
    pub fn total_pages(&self) -> usize {
        self.paginator().total_pages()
    }

    /// Posts shown on the current page (at most `per_page`)
    pub fn current_cards(&self) -> &[PostMeta] {
        &self.filtered[self.paginator().slice(self.page)]
    }

    /// Whether a previous page exists
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// "Page X of Y" indicator text
    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages().max(1))
    }
}
