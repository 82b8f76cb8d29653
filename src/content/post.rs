//! Blog post model

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use super::FrontMatter;
use crate::config::SiteConfig;
use crate::helpers;

/// Fallbacks applied when a post's front-matter omits a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDefaults {
    /// Public URL the content root is served under
    pub base_url: String,
    /// Placeholder read time
    pub read_time: String,
    /// Placeholder author
    pub author: String,
}

impl Default for PostDefaults {
    fn default() -> Self {
        Self {
            base_url: "/content/blogs".to_string(),
            read_time: "5 min read".to_string(),
            author: "Nubra Team".to_string(),
        }
    }
}

impl PostDefaults {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            read_time: config.defaults.read_time.clone(),
            author: config.defaults.author.clone(),
        }
    }
}

/// A resolved blog post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Folder name, the post's identity
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short summary for listings
    pub summary: String,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Estimated reading time
    pub read_time: String,

    /// Publication date as written in front-matter
    pub publish_date: String,

    /// Post author
    pub author: String,

    /// Markdown body with asset paths made absolute; empty in listings
    pub content: String,

    /// Whether the post folder carries its own stylesheet
    pub has_custom_styles: bool,
}

impl BlogPost {
    /// Build a post from parsed front-matter, filling absent fields from `defaults`
    pub fn from_front_matter(slug: &str, fm: FrontMatter, defaults: &PostDefaults) -> Self {
        Self {
            slug: slug.to_string(),
            title: fm.title.unwrap_or_else(|| slug.to_string()),
            summary: fm.summary.unwrap_or_default(),
            tags: fm.tags.unwrap_or_default(),
            read_time: fm.read_time.unwrap_or_else(|| defaults.read_time.clone()),
            publish_date: fm.publish_date.unwrap_or_else(helpers::today),
            author: fm.author.unwrap_or_else(|| defaults.author.clone()),
            content: String::new(),
            has_custom_styles: false,
        }
    }

    /// Whether the post carries `tag` (exact match)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether the post shares at least one tag with `other`
    pub fn shares_tag(&self, other: &BlogPost) -> bool {
        self.tags.iter().any(|t| other.has_tag(t))
    }

    /// Posts from `posts` sharing a tag with this one, excluding itself
    pub fn related<'a>(&self, posts: &'a [BlogPost], limit: usize) -> Vec<&'a BlogPost> {
        posts
            .iter()
            .filter(|p| p.slug != self.slug)
            .filter(|p| p.shares_tag(self))
            .take(limit)
            .collect()
    }

    /// Publish date in long form, for display
    pub fn display_date(&self) -> String {
        helpers::full_date(&self.publish_date)
    }
}

/// Sort posts newest first
///
/// Unparsable dates sort after every parsable one. The sort is stable, so
/// ties keep their incoming order.
pub fn sort_by_publish_date(posts: &mut [BlogPost]) {
    // None orders below Some, so reversing puts unparsable dates last
    posts.sort_by_cached_key(|p| Reverse(helpers::parse_publish_date(&p.publish_date)));
}
