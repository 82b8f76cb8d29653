//! Post resolver - turns slugs into blog posts
//!
//! Every call builds fresh [`BlogPost`] values from the source: fetch,
//! split front-matter, rewrite asset paths, probe the stylesheet. Nothing is
//! cached between calls, and a failing post never fails a listing.

use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::post::{sort_by_publish_date, BlogPost, PostDefaults};
use super::rewrite::rewrite_asset_paths;
use super::source::{ContentSource, INDEX_FILE, STYLES_FILE};
use super::{ContentIndex, FrontMatter};
use crate::helpers;

/// Resolves posts for the slugs known to a [`ContentIndex`]
pub struct PostResolver<S> {
    source: S,
    index: Arc<ContentIndex>,
    defaults: PostDefaults,
}

impl<S: ContentSource> PostResolver<S> {
    pub fn new(source: S, index: Arc<ContentIndex>, defaults: PostDefaults) -> Self {
        Self {
            source,
            index,
            defaults,
        }
    }

    pub fn index(&self) -> &Arc<ContentIndex> {
        &self.index
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn defaults(&self) -> &PostDefaults {
        &self.defaults
    }

    /// Metadata for every known post, newest first
    ///
    /// Bodies are left empty and stylesheets are not probed. Posts that fail
    /// to fetch are logged and left out.
    pub async fn list_posts(&self) -> Vec<BlogPost> {
        let slugs = self.index.slugs();
        let fetches = slugs.iter().map(|slug| self.fetch_metadata(slug));

        let mut posts: Vec<BlogPost> = join_all(fetches).await.into_iter().flatten().collect();
        sort_by_publish_date(&mut posts);

        tracing::debug!("Listed {} of {} posts", posts.len(), slugs.len());
        posts
    }

    /// A fully resolved post, or `None` if the slug is unknown or unreadable
    pub async fn get_post(&self, slug: &str) -> Option<BlogPost> {
        if !self.index.contains(slug) {
            tracing::debug!("Unknown post slug: {}", slug);
            return None;
        }

        let raw = match self.source.fetch(slug, INDEX_FILE).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to load post {}: {}", slug, e);
                return None;
            }
        };

        let (fm, body) = FrontMatter::parse(&raw);
        let prefix = helpers::asset_prefix(&self.defaults.base_url, slug);
        let content = rewrite_asset_paths(body, &prefix).trim().to_string();
        let has_custom_styles = self.source.probe(slug, STYLES_FILE).await;

        let mut post = BlogPost::from_front_matter(slug, fm, &self.defaults);
        post.content = content;
        post.has_custom_styles = has_custom_styles;
        Some(post)
    }

    /// All tags across listed posts, deduplicated and sorted
    pub async fn list_tags(&self) -> Vec<String> {
        let tags: BTreeSet<String> = self
            .list_posts()
            .await
            .into_iter()
            .flat_map(|post| post.tags)
            .collect();
        tags.into_iter().collect()
    }

    /// Listed posts carrying `tag`
    pub async fn list_posts_by_tag(&self, tag: &str) -> Vec<BlogPost> {
        self.list_posts()
            .await
            .into_iter()
            .filter(|post| post.has_tag(tag))
            .collect()
    }

    /// Up to `limit` other posts sharing a tag with `post`, newest first
    pub async fn related_posts(&self, post: &BlogPost, limit: usize) -> Vec<BlogPost> {
        let posts = self.list_posts().await;
        post.related(&posts, limit).into_iter().cloned().collect()
    }

    /// Public URL of a post's optional stylesheet
    pub fn styles_url(&self, slug: &str) -> String {
        helpers::styles_url(&self.defaults.base_url, slug, STYLES_FILE)
    }

    /// Front-matter only; `None` (logged) when the fetch fails
    async fn fetch_metadata(&self, slug: &str) -> Option<BlogPost> {
        match self.source.fetch(slug, INDEX_FILE).await {
            Ok(raw) => {
                let (fm, _) = FrontMatter::parse(&raw);
                Some(BlogPost::from_front_matter(slug, fm, &self.defaults))
            }
            Err(e) => {
                tracing::warn!("Excluding post {} from listing: {}", slug, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::source::{FetchError, FsSource};
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory source that counts calls and can delay individual posts
    #[derive(Default)]
    struct MockSource {
        files: HashMap<(String, String), String>,
        delays: HashMap<String, u64>,
        fetches: AtomicUsize,
        probes: AtomicUsize,
    }

    impl MockSource {
        fn with_post(mut self, slug: &str, raw: &str) -> Self {
            self.files
                .insert((slug.to_string(), INDEX_FILE.to_string()), raw.to_string());
            self
        }

        fn with_styles(mut self, slug: &str) -> Self {
            self.files
                .insert((slug.to_string(), STYLES_FILE.to_string()), String::new());
            self
        }

        fn with_delay(mut self, slug: &str, millis: u64) -> Self {
            self.delays.insert(slug.to_string(), millis);
            self
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl ContentSource for MockSource {
        async fn fetch(&self, slug: &str, file: &str) -> Result<String, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if let Some(millis) = self.delays.get(slug) {
                tokio::time::sleep(Duration::from_millis(*millis)).await;
            }
            self.files
                .get(&(slug.to_string(), file.to_string()))
                .cloned()
                .ok_or_else(|| FetchError::NotFound {
                    path: format!("{}/{}", slug, file),
                })
        }

        async fn probe(&self, slug: &str, file: &str) -> bool {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.files
                .contains_key(&(slug.to_string(), file.to_string()))
        }
    }

    fn resolver(source: MockSource, slugs: &[&str]) -> PostResolver<MockSource> {
        let index = Arc::new(ContentIndex::from_slugs("/content/blogs", slugs.iter().copied()));
        PostResolver::new(source, index, PostDefaults::default())
    }

    fn dated(title: &str, date: &str, tags: &str) -> String {
        format!(
            "---\ntitle: {}\npublishDate: {}\ntags: {}\n---\n\nBody of {}.\n",
            title, date, tags, title
        )
    }

    #[tokio::test]
    async fn test_list_posts_sorted_newest_first() {
        let source = MockSource::default()
            .with_post("authentication", &dated("Auth", "2024-12-20", r#"["Security"]"#))
            .with_post("uat-vs-live", &dated("UAT", "2024-12-18", r#"["Environments"]"#));
        let resolver = resolver(source, &["authentication", "uat-vs-live"]);

        let posts = resolver.list_posts().await;
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["authentication", "uat-vs-live"]);
        assert!(posts.iter().all(|p| p.content.is_empty()));
        assert_eq!(resolver.source().probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_order_independent_of_completion_order() {
        // Oldest post resolves first, newest last
        let source = MockSource::default()
            .with_post("a-old", &dated("Old", "2023-01-01", "[]"))
            .with_post("b-mid", &dated("Mid", "2024-06-01", "[]"))
            .with_post("c-new", &dated("New", "2025-01-01", "[]"))
            .with_delay("a-old", 1)
            .with_delay("b-mid", 20)
            .with_delay("c-new", 40);
        let resolver = resolver(source, &["a-old", "b-mid", "c-new"]);

        let posts = resolver.list_posts().await;
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c-new", "b-mid", "a-old"]);
    }

    #[tokio::test]
    async fn test_failed_post_is_excluded() {
        let source = MockSource::default()
            .with_post("authentication", &dated("Auth", "2024-12-20", "[]"));
        let resolver = resolver(source, &["authentication", "broken"]);

        let posts = resolver.list_posts().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "authentication");

        assert!(resolver.get_post("broken").await.is_none());
    }

    #[tokio::test]
    async fn test_get_post_round_trip() {
        let raw = "---\ntitle: \"X\"\ntags: [\"a\",\"b\"]\n---\n\n  Intro ![diagram](./assets/flow.png)\n\n";
        let source = MockSource::default().with_post("authentication", raw);
        let resolver = resolver(source, &["authentication"]);

        let post = resolver.get_post("authentication").await.unwrap();
        assert_eq!(post.title, "X");
        assert_eq!(post.tags, vec!["a", "b"]);
        assert_eq!(
            post.content,
            "Intro ![diagram](/content/blogs/authentication/assets/flow.png)"
        );
        assert!(!post.has_custom_styles);
        assert_eq!(post.read_time, "5 min read");
        assert_eq!(post.author, "Nubra Team");
    }

    #[tokio::test]
    async fn test_get_post_without_front_matter() {
        let source = MockSource::default().with_post("plain", "\n# Just markdown\n");
        let resolver = resolver(source, &["plain"]);

        let post = resolver.get_post("plain").await.unwrap();
        assert_eq!(post.title, "plain");
        assert_eq!(post.content, "# Just markdown");
        assert_eq!(post.publish_date, helpers::today());
    }

    #[tokio::test]
    async fn test_unknown_slug_does_not_fetch() {
        let source = MockSource::default().with_post("authentication", "body");
        let resolver = resolver(source, &["authentication"]);

        assert!(resolver.get_post("nonexistent-slug").await.is_none());
        assert_eq!(resolver.source().fetch_count(), 0);
        assert_eq!(resolver.source().probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_custom_styles_detected() {
        let source = MockSource::default()
            .with_post("styled", "body")
            .with_styles("styled")
            .with_post("plain", "body");
        let resolver = resolver(source, &["plain", "styled"]);

        assert!(resolver.get_post("styled").await.unwrap().has_custom_styles);
        assert!(!resolver.get_post("plain").await.unwrap().has_custom_styles);
        assert_eq!(
            resolver.styles_url("styled"),
            "/content/blogs/styled/styles.css"
        );
    }

    #[tokio::test]
    async fn test_tags_and_filtering() {
        let source = MockSource::default()
            .with_post("a", &dated("A", "2024-12-15", r#"["Performance", "Infrastructure"]"#))
            .with_post("b", &dated("B", "2024-12-08", r#"["API Design", "WebSockets"]"#))
            .with_post("c", &dated("C", "2024-11-15", r#"["Rust", "Performance"]"#));
        let resolver = resolver(source, &["a", "b", "c"]);

        assert_eq!(
            resolver.list_tags().await,
            vec!["API Design", "Infrastructure", "Performance", "Rust", "WebSockets"]
        );

        let perf: Vec<_> = resolver
            .list_posts_by_tag("Performance")
            .await
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(perf, vec!["a", "c"]);

        assert!(resolver.list_posts_by_tag("performance").await.is_empty());
    }

    #[tokio::test]
    async fn test_related_posts() {
        let source = MockSource::default()
            .with_post("a", &dated("A", "2024-12-15", r#"["Performance"]"#))
            .with_post("b", &dated("B", "2024-12-08", r#"["WebSockets"]"#))
            .with_post("c", &dated("C", "2024-11-15", r#"["Rust", "Performance"]"#))
            .with_post("d", &dated("D", "2024-11-01", r#"["Rust"]"#));
        let resolver = resolver(source, &["a", "b", "c", "d"]);

        let current = resolver.get_post("c").await.unwrap();
        let related: Vec<_> = resolver
            .related_posts(&current, 2)
            .await
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(related, vec!["a", "d"]);
    }

    #[tokio::test]
    async fn test_resolves_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("authentication").join("assets")).unwrap();
        fs::write(
            root.join("authentication").join(INDEX_FILE),
            "---\npublishDate: 2024-12-20\n---\n![diagram](./assets/flow.png)\n",
        )
        .unwrap();
        fs::write(root.join("authentication").join(STYLES_FILE), "h1 {}").unwrap();
        fs::create_dir_all(root.join("uat-vs-live")).unwrap();
        fs::write(
            root.join("uat-vs-live").join(INDEX_FILE),
            "---\npublishDate: 2024-12-18\n---\nBody\n",
        )
        .unwrap();

        let index = Arc::new(ContentIndex::scan(root).unwrap());
        let resolver = PostResolver::new(FsSource::new(root), index, PostDefaults::default());

        let slugs: Vec<_> = resolver
            .list_posts()
            .await
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(slugs, vec!["authentication", "uat-vs-live"]);

        let post = resolver.get_post("authentication").await.unwrap();
        assert_eq!(
            post.content,
            "![diagram](/content/blogs/authentication/assets/flow.png)"
        );
        assert!(post.has_custom_styles);

        // Deleted after discovery: listed as missing, not an error
        fs::remove_file(root.join("uat-vs-live").join(INDEX_FILE)).unwrap();
        assert_eq!(resolver.list_posts().await.len(), 1);
        assert!(resolver.get_post("uat-vs-live").await.is_none());
    }
}
