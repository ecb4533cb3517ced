//! Helper functions shared by the generator and the preview server

mod date;
mod html;
mod seo;
mod url;

pub use date::*;
pub use html::*;
pub use seo::*;
pub use url::*;
