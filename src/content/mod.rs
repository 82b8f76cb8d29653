//! Content module - discovers posts and resolves them into blog posts

pub mod discovery;
mod frontmatter;
pub mod manifest;
mod post;
pub mod resolver;
pub mod rewrite;
pub mod source;

pub use discovery::{scan, ContentIndex, DiscoveryError};
pub use frontmatter::{FrontMatter, FrontMatterValue, RawFrontMatter};
pub use manifest::{ManifestError, SlugManifest};
pub use post::{sort_by_publish_date, BlogPost, PostDefaults};
pub use resolver::PostResolver;
pub use rewrite::rewrite_asset_paths;
pub use source::{ContentSource, FetchError, FsSource};
