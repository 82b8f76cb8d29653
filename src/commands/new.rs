//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::content::source::{ASSETS_DIR, INDEX_FILE};
use crate::helpers;
use crate::Blog;

/// Create `{content_dir}/{slug}/index.md` with a front-matter scaffold
///
/// The slug defaults to the slugified title. Returns the new file's path.
pub fn create_post(blog: &Blog, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };

    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}", title);
    }

    let post_dir = blog.content_dir.join(&slug);
    let file_path = post_dir.join(INDEX_FILE);

    // Check if post already exists
    if file_path.exists() {
        anyhow::bail!("Post already exists: {:?}", file_path);
    }

    fs::create_dir_all(post_dir.join(ASSETS_DIR))?;

    let content = format!(
        r#"---
title: "{title}"
summary: ""
tags: []
readTime: {read_time}
publishDate: {date}
author: {author}
---

# {title}
"#,
        title = title,
        read_time = blog.config.defaults.read_time,
        date = helpers::today(),
        author = blog.config.defaults.author,
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}
