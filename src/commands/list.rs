//! List site content

use anyhow::Result;
use std::collections::BTreeMap;

use crate::Blog;

/// List site content by type
pub async fn run(blog: &Blog, content_type: &str, tag: Option<&str>) -> Result<()> {
    let resolver = blog.resolver()?;

    match content_type {
        "post" | "posts" => {
            let posts = match tag {
                Some(tag) => resolver.list_posts_by_tag(tag).await,
                None => resolver.list_posts().await,
            };
            match tag {
                Some(tag) => println!("Posts tagged {:?} ({}):", tag, posts.len()),
                None => println!("Posts ({}):", posts.len()),
            }
            for post in posts {
                println!(
                    "  {} - {} [{}] ({})",
                    post.publish_date,
                    post.title,
                    post.slug,
                    post.tags.join(", ")
                );
            }
        }
        "tag" | "tags" => {
            let posts = resolver.list_posts().await;
            let mut counts: BTreeMap<String, usize> = BTreeMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *counts.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            println!("Tags ({}):", counts.len());
            for (tag, count) in counts {
                println!("  {} ({})", tag, count);
            }
        }
        "slug" | "slugs" => {
            let slugs = resolver.index().slugs();
            println!("Slugs ({}):", slugs.len());
            for slug in slugs.iter() {
                println!("  {}", slug);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, tag, slug",
                content_type
            );
        }
    }

    Ok(())
}
