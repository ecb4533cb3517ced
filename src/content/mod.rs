//! Post content - markdown rendering and article loading

mod article;
mod markdown;

pub use article::{Article, ArticleError, ArticleLoader};
pub use markdown::MarkdownRenderer;
