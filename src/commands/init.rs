//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::content::source::{ASSETS_DIR, INDEX_FILE};
use crate::helpers;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?}", config_path);
    }

    let defaults = SiteConfig::default();

    // Create directory structure
    let content_dir = target_dir.join(&defaults.content_dir);
    fs::create_dir_all(&content_dir)?;

    let config_content = format!(
        r#"# Blog Configuration

# Site
title: {title}

# Directory
content_dir: {content_dir}
manifest: {manifest}

# URL
base_url: {base_url}

# Writing
defaults:
  read_time: {read_time}
  author: {author}
related_posts: {related}

# Server
server:
  ip: {ip}
  port: {port}
  debounce_ms: {debounce}
"#,
        title = defaults.title,
        content_dir = defaults.content_dir,
        manifest = defaults.manifest,
        base_url = defaults.base_url,
        read_time = defaults.defaults.read_time,
        author = defaults.defaults.author,
        related = defaults.related_posts,
        ip = defaults.server.ip,
        port = defaults.server.port,
        debounce = defaults.server.debounce_ms,
    );

    fs::write(&config_path, config_content)?;

    // Create a sample post
    let post_dir = content_dir.join("hello-world");
    fs::create_dir_all(post_dir.join(ASSETS_DIR))?;

    let sample_post = format!(
        r#"---
title: Hello World
summary: Your very first post.
tags: ["Getting Started"]
readTime: 1 min read
publishDate: {}
author: {}
---

# Hello World

Every folder under the content root with an `{}` is a post. Put images
next to it in `assets/` and reference them relatively:

![placeholder](./assets/placeholder.png)

Add a `styles.css` to the folder to style this post alone.
"#,
        helpers::today(),
        defaults.defaults.author,
        INDEX_FILE,
    );

    fs::write(post_dir.join(INDEX_FILE), sample_post)?;

    Ok(())
}
