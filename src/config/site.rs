//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,

    // Directory
    /// Content root, relative to the base directory
    pub content_dir: String,
    /// Where `scan` writes the slug manifest, relative to the base directory
    pub manifest: String,

    // URL
    /// Public URL the content root is served under
    pub base_url: String,

    // Writing
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Number of related posts shown alongside a post
    pub related_posts: usize,

    // Server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Engineering Blogs".to_string(),

            content_dir: "public/content/blogs".to_string(),
            manifest: "public/content/blogs.json".to_string(),

            base_url: "/content/blogs".to_string(),

            defaults: DefaultsConfig::default(),
            related_posts: 2,

            server: ServerConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Placeholders for front-matter fields a post leaves out
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub read_time: String,
    pub author: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            read_time: "5 min read".to_string(),
            author: "Nubra Team".to_string(),
        }
    }
}

/// Development server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
    /// Quiet period before a burst of file events triggers a re-scan
    pub debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
            debounce_ms: 500,
        }
    }
}
