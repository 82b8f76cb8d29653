//! blog-pipeline: content discovery and post resolution for a markdown blog
//!
//! Posts live under a content root as `{slug}/index.md`, with optional
//! `{slug}/assets/` media and a `{slug}/styles.css` stylesheet. Discovery
//! finds the slugs; the resolver turns a slug into a [`content::BlogPost`]
//! with front-matter applied and asset paths made absolute.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentIndex, FsSource, PostDefaults, PostResolver};

/// The blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content root holding one folder per post
    pub content_dir: PathBuf,
    /// Slug manifest output path
    pub manifest_path: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let manifest_path = base_dir.join(&config.manifest);

        Self {
            config,
            base_dir,
            content_dir,
            manifest_path,
        }
    }

    /// Scan the content root
    ///
    /// An unreadable root is a configuration error and fails startup.
    pub fn index(&self) -> Result<ContentIndex> {
        Ok(ContentIndex::scan(&self.content_dir)?)
    }

    /// Build a filesystem-backed resolver over a fresh scan
    pub fn resolver(&self) -> Result<PostResolver<FsSource>> {
        let index = Arc::new(self.index()?);
        Ok(self.resolver_with(index))
    }

    /// Build a filesystem-backed resolver over an existing index
    pub fn resolver_with(&self, index: Arc<ContentIndex>) -> PostResolver<FsSource> {
        PostResolver::new(
            FsSource::new(&self.content_dir),
            index,
            PostDefaults::from_config(&self.config),
        )
    }

    /// Initialize a new site
    pub fn init(&self) -> Result<()> {
        commands::init::init_site(&self.base_dir)
    }

    /// Scan and write the slug manifest to `out`, or the configured path
    pub fn scan(&self, out: Option<&Path>) -> Result<Vec<String>> {
        commands::scan::run(self, out)
    }

    /// Remove generated files
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, slug: Option<&str>) -> Result<PathBuf> {
        commands::new::create_post(self, title, slug)
    }
}
